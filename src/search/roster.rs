//! Company roster filter.
//!
//! A posting is kept when some roster name appears, case-insensitively,
//! anywhere in its company field. "Apple" therefore keeps "Apple Inc."
//! but also any unrelated employer whose name happens to contain it.

use crate::models::Posting;

/// Built-in roster of large employers.
pub const DEFAULT_COMPANIES: &[&str] = &[
    "Apple", "Microsoft", "Amazon", "Google", "Meta", "Tesla", "JP Morgan", "Walmart",
    "Berkshire Hathaway", "UnitedHealth", "ExxonMobil", "Chevron", "Ford", "IBM",
    "Goldman Sachs", "Johnson & Johnson", "Pfizer", "Coca-Cola", "PepsiCo", "Intel",
    "Cisco", "Oracle", "Bank of America", "AT&T", "Verizon", "General Motors", "Home Depot",
    "Wells Fargo", "Citigroup", "Nike", "Puma", "Procter & Gamble", "Dell", "American Express",
    "3M", "Honeywell", "Lockheed Martin", "Boeing", "Disney", "Starbucks", "UPS", "FedEx",
    "Salesforce", "Qualcomm", "Morgan Stanley", "Caterpillar", "Best Buy", "CVS Health",
    "American Airlines", "Capital One", "Uber", "Lyft", "PayPal", "Adobe", "Netflix",
    "Visa", "Mastercard", "Costco", "Johnson Controls", "General Electric", "Raytheon",
    "Marriott", "Southwest Airlines", "General Dynamics", "HP", "Uber Technologies",
    "Abbott Laboratories", "Bristol Myers Squibb", "Eli Lilly", "Medtronic", "Merck",
    "United Airlines", "Hilton", "T-Mobile", "Broadcom", "AMD", "Micron Technology",
    "Applied Materials", "Chubb", "PNC Financial Services", "Cigna", "AIG", "Progressive",
    "Allstate", "State Farm", "Coca-Cola Bottling Co", "Estee Lauder", "Colgate-Palmolive",
    "Kraft Heinz", "McDonald's", "Yum Brands", "Domino's", "Darden Restaurants",
    "Tractor Supply", "Tesla Energy", "Halliburton", "Schlumberger", "ConocoPhillips",
    "Phillips 66", "Dow Chemical", "Eaton", "Danaher", "Northrop Grumman", "SpaceX",
    "Blue Origin", "Berkshire Hathaway Energy", "Exelon", "Duke Energy", "NextEra Energy",
    "American Electric Power", "Southern Company", "PG&E", "Xcel Energy", "Dominion Energy",
];

/// Target employers, matched by substring.
#[derive(Debug, Clone)]
pub struct CompanyRoster {
    names: Vec<String>,
    /// Lower-cased copies of `names`, same order.
    needles: Vec<String>,
}

impl CompanyRoster {
    /// Blank names are dropped; they would match every company.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        let needles = names.iter().map(|n| n.to_lowercase()).collect();

        Self { names, needles }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether `company` contains any roster name.
    pub fn matches(&self, company: &str) -> bool {
        let company = company.to_lowercase();
        self.needles.iter().any(|needle| company.contains(needle.as_str()))
    }

    /// Keep matching postings, in input order.
    pub fn filter(&self, postings: Vec<Posting>) -> Vec<Posting> {
        postings
            .into_iter()
            .filter(|p| self.matches(&p.company))
            .collect()
    }
}

impl Default for CompanyRoster {
    fn default() -> Self {
        Self::new(DEFAULT_COMPANIES)
    }
}
