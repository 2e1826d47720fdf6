//! Canonical transaction types produced by statement ingestion

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::text::clean_narration;

/// Direction of a transaction, derived from the sign of its amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxnType {
    #[serde(rename = "credit")]
    Credit,
    #[serde(rename = "debit")]
    Debit,
    #[serde(rename = "neutral")]
    Neutral,
}

impl TxnType {
    /// Positive amounts are credits, negative are debits, zero is neutral.
    pub fn from_amount(amount: f64) -> Self {
        if amount > 0.0 {
            TxnType::Credit
        } else if amount < 0.0 {
            TxnType::Debit
        } else {
            TxnType::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TxnType::Credit => "credit",
            TxnType::Debit => "debit",
            TxnType::Neutral => "neutral",
        }
    }
}

/// A normalized statement row. Built once at load time; never mutated after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub day: u32,
    /// Full month name ("January")
    pub month_name: String,
    /// Full weekday name ("Monday")
    pub weekday: String,
    /// Cleaned narration, used for display
    pub description: String,
    pub txn_type: TxnType,
    /// Signed: credit value minus debit value
    pub amount: f64,
    /// Running balance, when the statement carries one
    pub balance: Option<f64>,
    /// Original narration, used for classification
    pub raw_text: String,
    pub category_l1: String,
    pub category_l2: String,
    pub category_l3: String,
    pub category_l4: String,
    pub source_bank: String,
}

impl Transaction {
    /// Create a transaction with the date parts and cleaned description
    /// derived. Balance, categories, and source bank start empty; fill them
    /// with the `with_*` builders.
    pub fn new(date: NaiveDate, raw_text: impl Into<String>, amount: f64) -> Self {
        let raw_text = raw_text.into();
        Self {
            date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            month_name: date.format("%B").to_string(),
            weekday: date.format("%A").to_string(),
            description: clean_narration(&raw_text),
            txn_type: TxnType::from_amount(amount),
            amount,
            balance: None,
            raw_text,
            category_l1: String::new(),
            category_l2: String::new(),
            category_l3: String::new(),
            category_l4: String::new(),
            source_bank: String::new(),
        }
    }

    pub fn with_balance(mut self, balance: Option<f64>) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_categories(mut self, l1: &str, l2: &str, l3: &str, l4: &str) -> Self {
        self.category_l1 = l1.to_string();
        self.category_l2 = l2.to_string();
        self.category_l3 = l3.to_string();
        self.category_l4 = l4.to_string();
        self
    }

    pub fn with_source(mut self, source_bank: &str) -> Self {
        self.source_bank = source_bank.to_string();
        self
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Returns true if this is income (positive amount)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    /// Grouping key for monthly series: "YYYY-MM". Lexicographic order is
    /// chronological order for this format.
    pub fn month_key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}
