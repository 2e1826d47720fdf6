//! Fixed five-bucket rules for the dashboard's category charts.
//!
//! Intentionally a separate, smaller vocabulary than the 4-level statement
//! classifier: this one answers "which dashboard line does this point land
//! on", and the two may disagree on the same narration.

use serde::{Deserialize, Serialize};

/// The dashboard's fixed category vocabulary. Every chart row carries all
/// five keys, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "rent")]
    Rent,
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "refund")]
    Refund,
    #[serde(rename = "food")]
    Food,
    #[serde(rename = "travel")]
    Travel,
}

impl Bucket {
    /// Position in the fixed chart order.
    pub fn index(&self) -> usize {
        match self {
            Bucket::Rent => 0,
            Bucket::Income => 1,
            Bucket::Refund => 2,
            Bucket::Food => 3,
            Bucket::Travel => 4,
        }
    }
}

const REFUND_KEYWORDS: &[&str] = &["refund", "reversal", "cashback", "chargeback", "returned"];
const INCOME_KEYWORDS: &[&str] = &["salary", "interest", "dividend", "bonus", "payout", "income"];
const RENT_KEYWORDS: &[&str] = &["rent", "lease", "landlord", "house rent"];
const FOOD_KEYWORDS: &[&str] = &[
    "swiggy",
    "zomato",
    "restaurant",
    "cafe",
    "food",
    "dine",
    "blinkit",
    "instamart",
    "grocery",
    "bigbasket",
];
const TRAVEL_KEYWORDS: &[&str] = &[
    "uber",
    "ola",
    "irctc",
    "flight",
    "metro",
    "taxi",
    "bus",
    "train",
    "makemytrip",
    "goibibo",
];

/// Map a narration and signed amount to a dashboard bucket.
///
/// Credits are refunds when a refund keyword hits, income otherwise.
/// Debits check rent, then food, travel, income, refund keywords in that
/// order. Zero amounts and unmatched debits land in no bucket.
pub fn bucket_for(raw_text: &str, amount: f64) -> Option<Bucket> {
    let text = raw_text.to_lowercase();
    let has = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    if amount > 0.0 {
        if has(REFUND_KEYWORDS) {
            return Some(Bucket::Refund);
        }
        return Some(Bucket::Income);
    }

    if amount < 0.0 {
        if has(RENT_KEYWORDS) {
            return Some(Bucket::Rent);
        }
        if has(FOOD_KEYWORDS) {
            return Some(Bucket::Food);
        }
        if has(TRAVEL_KEYWORDS) {
            return Some(Bucket::Travel);
        }
        if has(INCOME_KEYWORDS) {
            return Some(Bucket::Income);
        }
        if has(REFUND_KEYWORDS) {
            return Some(Bucket::Refund);
        }
    }

    None
}
