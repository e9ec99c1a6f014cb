//! Writes a deterministic synthetic churn table plus the three matching
//! prediction tables, for demos and manual testing.
//!
//! Output: `churn.csv`, `all_customers_predictions.csv`,
//! `predicted_churners.csv`, `prediction_summary.csv` in the working
//! directory.

use std::fs::File;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i32
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_f64() * options.len() as f64) as usize % options.len()]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const STATES: [&str; 10] = [
    "Andhra Pradesh",
    "Bihar",
    "Delhi",
    "Gujarat",
    "Karnataka",
    "Maharashtra",
    "Punjab",
    "Rajasthan",
    "Tamil Nadu",
    "Uttar Pradesh",
];
const CONTRACTS: [&str; 3] = ["Month-to-Month", "One Year", "Two Year"];
const INTERNET: [&str; 3] = ["Fiber Optic", "Cable", "DSL"];
const PAYMENTS: [&str; 3] = ["Credit Card", "Bank Withdrawal", "Mailed Check"];
const REASONS: [(&str, &str); 6] = [
    ("Competitor", "Competitor made better offer"),
    ("Competitor", "Competitor had better devices"),
    ("Attitude", "Attitude of support person"),
    ("Dissatisfaction", "Network reliability"),
    ("Price", "Price too high"),
    ("Other", "Moved"),
];
const RISK_FACTOR_POOL: [&str; 5] = [
    "Month-to-Month Contract",
    "High Monthly Charge",
    "Low Tenure",
    "No Online Security",
    "Fiber Optic Issues",
];

fn yes_no(rng: &mut SimpleRng, p_yes: f64) -> &'static str {
    if rng.chance(p_yes) {
        "Yes"
    } else {
        "No"
    }
}

struct Row {
    id: String,
    gender: &'static str,
    age: i32,
    married: &'static str,
    state: &'static str,
    referrals: i32,
    tenure: i32,
    contract: &'static str,
    internet: Option<&'static str>,
    payment: &'static str,
    monthly: f64,
    revenue: f64,
    refunds: f64,
    status: &'static str,
    churn_prob: f64,
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n = 2000;

    let mut rows = Vec::with_capacity(n);
    for i in 0..n {
        let contract = rng.pick(&CONTRACTS);
        let tenure = rng.range(1, 72);
        let monthly = 20.0 + rng.next_f64() * 100.0;
        let internet = if rng.chance(0.85) {
            Some(rng.pick(&INTERNET))
        } else {
            None
        };

        // Month-to-month, short-tenure, expensive customers churn more.
        let mut churn_prob = 0.15;
        if contract == "Month-to-Month" {
            churn_prob += 0.25;
        }
        if tenure < 12 {
            churn_prob += 0.15;
        }
        if monthly > 90.0 {
            churn_prob += 0.10;
        }

        let status = if tenure <= 3 && rng.chance(0.5) {
            "Joined"
        } else if rng.chance(churn_prob) {
            "Churned"
        } else {
            "Stayed"
        };

        rows.push(Row {
            id: format!("CUST{i:05}"),
            gender: rng.pick(&["Female", "Male"]),
            age: rng.range(18, 80),
            married: rng.pick(&["Yes", "No"]),
            state: rng.pick(&STATES),
            referrals: rng.range(0, 10),
            tenure,
            contract,
            internet,
            payment: rng.pick(&PAYMENTS),
            monthly,
            revenue: monthly * tenure as f64,
            refunds: if rng.chance(0.1) {
                rng.next_f64() * 40.0
            } else {
                0.0
            },
            status,
            churn_prob,
        });
    }

    write_churn_table(&rows, &mut rng);
    write_prediction_tables(&rows, &mut rng);
    println!("wrote churn.csv and prediction tables for {n} customers");
}

fn write_churn_table(rows: &[Row], rng: &mut SimpleRng) {
    let file = File::create("churn.csv").expect("create churn.csv");
    let mut w = csv::Writer::from_writer(file);
    w.write_record([
        "Customer_ID",
        "Gender",
        "Age",
        "Married",
        "State",
        "Number_of_Referrals",
        "Tenure_in_Months",
        "Value_Deal",
        "Phone_Service",
        "Multiple_Lines",
        "Internet_Type",
        "Online_Security",
        "Online_Backup",
        "Device_Protection_Plan",
        "Premium_Support",
        "Streaming_TV",
        "Streaming_Movies",
        "Streaming_Music",
        "Unlimited_Data",
        "Contract",
        "Paperless_Billing",
        "Payment_Method",
        "Monthly_Charge",
        "Total_Charges",
        "Total_Refunds",
        "Total_Extra_Data_Charges",
        "Total_Long_Distance_Charges",
        "Total_Revenue",
        "Customer_Status",
        "Churn_Category",
        "Churn_Reason",
    ])
    .expect("write header");

    for r in rows {
        let (category, reason) = if r.status == "Churned" {
            REASONS[(rng.next_f64() * REASONS.len() as f64) as usize % REASONS.len()]
        } else {
            ("", "")
        };
        let deal = if rng.chance(0.3) {
            format!("Deal {}", rng.range(1, 5))
        } else {
            String::new()
        };
        let extra = rng.next_f64() * 30.0;
        let long_distance = rng.next_f64() * 50.0;
        let charges = r.revenue - extra - long_distance + r.refunds;
        w.write_record([
            r.id.clone(),
            r.gender.to_string(),
            r.age.to_string(),
            r.married.to_string(),
            r.state.to_string(),
            r.referrals.to_string(),
            r.tenure.to_string(),
            deal,
            yes_no(rng, 0.9).to_string(),
            yes_no(rng, 0.4).to_string(),
            r.internet.unwrap_or("").to_string(),
            yes_no(rng, 0.3).to_string(),
            yes_no(rng, 0.35).to_string(),
            yes_no(rng, 0.3).to_string(),
            yes_no(rng, 0.3).to_string(),
            yes_no(rng, 0.4).to_string(),
            yes_no(rng, 0.4).to_string(),
            yes_no(rng, 0.35).to_string(),
            yes_no(rng, 0.7).to_string(),
            r.contract.to_string(),
            yes_no(rng, 0.6).to_string(),
            r.payment.to_string(),
            format!("{:.2}", r.monthly),
            format!("{:.2}", charges.max(0.0)),
            format!("{:.2}", r.refunds),
            format!("{:.2}", extra),
            format!("{:.2}", long_distance),
            format!("{:.2}", r.revenue),
            r.status.to_string(),
            category.to_string(),
            reason.to_string(),
        ])
        .expect("write row");
    }
    w.flush().expect("flush churn.csv");
}

fn write_prediction_tables(rows: &[Row], rng: &mut SimpleRng) {
    // Score only customers still around; jitter the base probability.
    let scored: Vec<(&Row, f64)> = rows
        .iter()
        .filter(|r| r.status != "Churned")
        .map(|r| {
            let p = (r.churn_prob + (rng.next_f64() - 0.5) * 0.3).clamp(0.01, 0.99);
            (r, p)
        })
        .collect();

    let file = File::create("all_customers_predictions.csv").expect("create scores file");
    let mut w = csv::Writer::from_writer(file);
    w.write_record(["Customer_ID", "Churn_Probability", "Risk_Level"])
        .expect("write header");
    for (r, p) in &scored {
        w.write_record([r.id.clone(), format!("{p:.4}"), risk_level(*p).to_string()])
            .expect("write row");
    }
    w.flush().expect("flush scores file");

    let churners: Vec<&(&Row, f64)> = scored.iter().filter(|(_, p)| *p > 0.5).collect();

    let file = File::create("predicted_churners.csv").expect("create churners file");
    let mut w = csv::Writer::from_writer(file);
    w.write_record([
        "Customer_ID",
        "Gender",
        "Age",
        "Married",
        "State",
        "Contract",
        "Payment_Method",
        "Tenure_in_Months",
        "Number_of_Referrals",
        "Monthly_Charge",
        "Total_Revenue",
        "Total_Refunds",
        "Churn_Probability",
        "Risk_Level",
        "Top_Risk_Factors",
    ])
    .expect("write header");
    for (r, p) in churners.iter().copied() {
        let mut factors = Vec::new();
        if r.contract == "Month-to-Month" {
            factors.push(RISK_FACTOR_POOL[0]);
        }
        if r.monthly > 90.0 {
            factors.push(RISK_FACTOR_POOL[1]);
        }
        if r.tenure < 12 {
            factors.push(RISK_FACTOR_POOL[2]);
        }
        if factors.is_empty() {
            factors.push(RISK_FACTOR_POOL
                [(rng.next_f64() * RISK_FACTOR_POOL.len() as f64) as usize % RISK_FACTOR_POOL.len()]);
        }
        w.write_record([
            r.id.clone(),
            r.gender.to_string(),
            r.age.to_string(),
            r.married.to_string(),
            r.state.to_string(),
            r.contract.to_string(),
            r.payment.to_string(),
            r.tenure.to_string(),
            r.referrals.to_string(),
            format!("{:.2}", r.monthly),
            format!("{:.2}", r.revenue),
            format!("{:.2}", r.refunds),
            format!("{p:.4}"),
            risk_level(*p).to_string(),
            factors.join(","),
        ])
        .expect("write row");
    }
    w.flush().expect("flush churners file");

    let avg_prob = if churners.is_empty() {
        0.0
    } else {
        churners.iter().map(|(_, p)| *p).sum::<f64>() / churners.len() as f64
    };
    let revenue_at_risk: f64 = churners.iter().map(|(r, _)| r.revenue).sum();

    let file = File::create("prediction_summary.csv").expect("create summary file");
    let mut w = csv::Writer::from_writer(file);
    w.write_record(["predicted_churners", "avg_churn_probability", "total_revenue_at_risk"])
        .expect("write header");
    w.write_record([
        churners.len().to_string(),
        format!("{avg_prob:.4}"),
        format!("{revenue_at_risk:.2}"),
    ])
    .expect("write row");
    w.flush().expect("flush summary file");
}

fn risk_level(p: f64) -> &'static str {
    if p >= 0.8 {
        "Critical"
    } else if p >= 0.7 {
        "High"
    } else if p >= 0.6 {
        "Medium"
    } else {
        "Low"
    }
}
