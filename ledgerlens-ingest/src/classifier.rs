//! Four-level category rules for statement narrations.
//!
//! The tables are hand-authored, ordered, and scanned top to bottom with
//! first match winning — order encodes priority, so reordering a rule is a
//! behavior change, not a refactor. The credit branch and the debit/neutral
//! branch are disjoint rule lists with their own fallbacks.

use ledgerlens_core::TxnType;

/// A 4-level category assignment (e.g. Expense → Food → swiggy → swiggy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPath {
    pub l1: &'static str,
    pub l2: &'static str,
    pub l3: &'static str,
    pub l4: &'static str,
}

impl CategoryPath {
    const fn new(l1: &'static str, l2: &'static str, l3: &'static str, l4: &'static str) -> Self {
        Self { l1, l2, l3, l4 }
    }
}

struct Rule {
    needles: &'static [&'static str],
    require_all: bool,
    path: CategoryPath,
}

impl Rule {
    const fn any(
        needles: &'static [&'static str],
        l1: &'static str,
        l2: &'static str,
        l3: &'static str,
        l4: &'static str,
    ) -> Self {
        Self { needles, require_all: false, path: CategoryPath::new(l1, l2, l3, l4) }
    }

    const fn all(
        needles: &'static [&'static str],
        l1: &'static str,
        l2: &'static str,
        l3: &'static str,
        l4: &'static str,
    ) -> Self {
        Self { needles, require_all: true, path: CategoryPath::new(l1, l2, l3, l4) }
    }

    fn matches(&self, text: &str) -> bool {
        if self.require_all {
            self.needles.iter().all(|n| text.contains(n))
        } else {
            self.needles.iter().any(|n| text.contains(n))
        }
    }
}

const CREDIT_RULES: &[Rule] = &[
    Rule::any(&["medicare"], "Income", "Refund", "Medical", "QRG"),
    Rule::any(&["barclays"], "Income", "ESOP", "Buyback", "Buyback"),
    Rule::any(&["zerodha broking"], "Transfer", "Equity", "Zerodha", "Zerodha"),
    Rule::any(&["salary"], "Income", "Salary", "Monthly Salary", "Employer"),
    Rule::any(&["flipkart"], "Income", "Salary", "Monthly Salary", "Flipkart"),
    Rule::any(&["interest"], "Income", "Interest", "Bank Interest", "Savings Interest"),
    Rule::any(&["rajasthan marud"], "Transfer", "Home", "Home", "Home"),
    Rule::any(&["ratan"], "Transfer", "Home", "Father", "Home"),
    Rule::any(&["rupinder"], "Transfer", "Home", "Mother", "Home"),
    Rule::any(&["priya"], "Transfer", "Priya", "Priya", "Priya"),
    Rule::any(&["the new india assu"], "Income", "Refund", "Medical", "Insurance"),
    Rule::all(&["avinder", "state"], "Transfer", "Self", "SBI", "SBI"),
    Rule::any(&["avinder"], "Transfer", "Self", "Others", "Others"),
];

const CREDIT_FALLBACK: CategoryPath =
    CategoryPath::new("Income", "Transfer", "Others", "Miscellaneous");

const DEBIT_RULES: &[Rule] = &[
    // Specific merchants and counterparties first.
    Rule::any(&["dainikbhaskar4"], "Expense", "Miscellaneous", "News Paper", "DB"),
    Rule::any(&["zerodhabroking"], "Investment", "Equity", "Zerodha", "Zerodha"),
    Rule::any(&["zerodhamf"], "Investment", "Mutual Fund", "SIP", "Mutual Fund"),
    Rule::any(&["appleservices"], "Expense", "Miscellaneous", "Subscription", "Apple"),
    Rule::any(&["altbalaji.razor"], "Expense", "Miscellaneous", "Subscription", "Alt Balaji"),
    Rule::any(&["blinkit"], "Expense", "Grocery", "blinkit", "blinkit"),
    Rule::any(&["zomato"], "Expense", "Food", "zomato", "zomato"),
    Rule::any(&["swiggy"], "Expense", "Food", "swiggy", "swiggy"),
    Rule::any(&["pizza"], "Expense", "Food", "Others", "pizza"),
    Rule::any(&["rajasthan marud"], "Transfer", "Home", "Home", "Home"),
    Rule::any(&["ratan"], "Transfer", "Home", "Father", "Home"),
    Rule::any(&["rupinder"], "Transfer", "Home", "Mother", "Home"),
    Rule::any(&["priya"], "Transfer", "Priya", "Priya", "Priya"),
    Rule::any(&["bbpsbp"], "Expense", "Utility", "Electricity", "Electricity"),
    Rule::any(&["airtelpostpaidb"], "Expense", "Utility", "Internet", "Airtel"),
    Rule::any(&["akshayakalpafar"], "Expense", "Grocery", "Milk", "Akshayakalpa"),
    // Generic transfer and payment patterns.
    Rule::any(&["neft", "imps", "rtgs"], "Transfer", "Internal", "Bank Transfer", "NEFT/IMPS"),
    Rule::any(&["card payment"], "Transfer", "Credit Card", "Card Payment", "Credit Card Bill"),
    Rule::any(&["cred"], "Transfer", "Credit Card", "Card Payment", "Credit Card Bill"),
    Rule::any(&["ppf"], "Investment", "Debt", "PPF", "PPF Contribution"),
    Rule::any(&["sip", "mutual"], "Investment", "Mutual Fund", "SIP", "Mutual Fund"),
    Rule::any(&["qrg"], "Expense", "Medical", "Hospital", "QRG"),
    Rule::any(&["trf to fd"], "Investment", "Debt", "FD", "FD"),
    Rule::any(&["cc billpay/self"], "Transfer", "Credit Card", "Card Payment", "Credit Card Bill"),
    Rule::any(&["groww"], "Investment", "Equity", "Groww", "Groww"),
    Rule::any(&["cloudnine"], "Expense", "Medical", "Hospital", "Cloudnine"),
    Rule::any(&["8750043112@ptye"], "Expense", "Rent", "Rent", "Rent"),
    Rule::any(&["personal loan"], "Expense", "Loan", "Loan EMI", "Loan EMI"),
    Rule::any(&["gst", "charge"], "Expense", "Financial", "Bank Charges", "Charges"),
    Rule::any(&["atm"], "Expense", "Operational", "Cash Withdrawal", "ATM"),
];

const DEBIT_FALLBACK: CategoryPath =
    CategoryPath::new("Expense", "Miscellaneous", "Others", "Other");

/// Assign a 4-level category to a narration.
///
/// Credits scan the credit table; debits and neutral rows scan the debit
/// table. Pure and total: every input maps to exactly one path.
pub fn classify(raw_text: &str, txn_type: TxnType) -> CategoryPath {
    let text = raw_text.to_lowercase();
    let (rules, fallback) = match txn_type {
        TxnType::Credit => (CREDIT_RULES, CREDIT_FALLBACK),
        TxnType::Debit | TxnType::Neutral => (DEBIT_RULES, DEBIT_FALLBACK),
    };

    rules
        .iter()
        .find(|rule| rule.matches(&text))
        .map(|rule| rule.path)
        .unwrap_or(fallback)
}
