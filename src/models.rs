use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============ Profile Fields ============

/// Home ownership options offered by the console.
pub const HOME_OWNERSHIP_OPTIONS: &[&str] = &["RENT", "OWN", "MORTGAGE", "OTHER"];
/// Loan intent options offered by the console.
pub const LOAN_INTENT_OPTIONS: &[&str] = &[
    "PERSONAL",
    "EDUCATION",
    "MEDICAL",
    "VENTURE",
    "HOMEIMPROVEMENT",
    "DEBTCONSOLIDATION",
];
/// Loan grades, best to worst.
pub const LOAN_GRADE_OPTIONS: &[&str] = &["A", "B", "C", "D", "E", "F", "G"];
/// Prior default flag options.
pub const DEFAULT_FLAG_OPTIONS: &[&str] = &["Y", "N"];
/// Gender options.
pub const GENDER_OPTIONS: &[&str] = &["Male", "Female"];
/// Model engines the decision service can be asked to use.
pub const MODEL_CHOICE_OPTIONS: &[&str] = &["xgboost", "random_forest", "mlp_baseline"];
/// Narrative tones the decision service can write in.
pub const TONE_OPTIONS: &[&str] = &["executive", "technical", "simple"];

/// An editable field of the applicant profile.
///
/// `as_str` yields the exact wire name used in the `/predict` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Age,
    Income,
    HomeOwnership,
    EmploymentLength,
    LoanIntent,
    LoanGrade,
    LoanAmount,
    InterestRate,
    PriorDefault,
    CreditHistoryLength,
    Gender,
    ModelChoice,
    Tone,
}

impl ProfileField {
    /// Every field, in payload order.
    pub const ALL: [ProfileField; 13] = [
        ProfileField::Age,
        ProfileField::Income,
        ProfileField::HomeOwnership,
        ProfileField::EmploymentLength,
        ProfileField::LoanIntent,
        ProfileField::LoanGrade,
        ProfileField::LoanAmount,
        ProfileField::InterestRate,
        ProfileField::PriorDefault,
        ProfileField::CreditHistoryLength,
        ProfileField::Gender,
        ProfileField::ModelChoice,
        ProfileField::Tone,
    ];

    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileField::Age => "person_age",
            ProfileField::Income => "person_income",
            ProfileField::HomeOwnership => "person_home_ownership",
            ProfileField::EmploymentLength => "person_emp_length",
            ProfileField::LoanIntent => "loan_intent",
            ProfileField::LoanGrade => "loan_grade",
            ProfileField::LoanAmount => "loan_amnt",
            ProfileField::InterestRate => "loan_int_rate",
            ProfileField::PriorDefault => "cb_person_default_on_file",
            ProfileField::CreditHistoryLength => "cb_person_cred_hist_length",
            ProfileField::Gender => "person_gender",
            ProfileField::ModelChoice => "model_choice",
            ProfileField::Tone => "tone",
        }
    }

    /// Numeric fields go through permissive float parsing; the rest are stored verbatim.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ProfileField::Age
                | ProfileField::Income
                | ProfileField::EmploymentLength
                | ProfileField::LoanAmount
                | ProfileField::InterestRate
                | ProfileField::CreditHistoryLength
        )
    }

    /// Fields whose edits re-arm the what-if simulation.
    pub fn is_simulation_tracked(self) -> bool {
        matches!(self, ProfileField::LoanAmount | ProfileField::Income)
    }

    /// Known options for a categorical field. Empty for numeric fields.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            ProfileField::HomeOwnership => HOME_OWNERSHIP_OPTIONS,
            ProfileField::LoanIntent => LOAN_INTENT_OPTIONS,
            ProfileField::LoanGrade => LOAN_GRADE_OPTIONS,
            ProfileField::PriorDefault => DEFAULT_FLAG_OPTIONS,
            ProfileField::Gender => GENDER_OPTIONS,
            ProfileField::ModelChoice => MODEL_CHOICE_OPTIONS,
            ProfileField::Tone => TONE_OPTIONS,
            _ => &[],
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a field name does not match any profile field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown profile field: {}", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl FromStr for ProfileField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        ProfileField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| UnknownField(name.to_string()))
    }
}

// ============ Profile ============

/// The applicant profile sent as the `/predict` payload.
///
/// Categorical fields hold whatever the user typed; the option lists above are
/// offered for convenience but never enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub person_age: f64,
    pub person_income: f64,
    pub person_home_ownership: String,
    pub person_emp_length: f64,
    pub loan_intent: String,
    pub loan_grade: String,
    pub loan_amnt: f64,
    pub loan_int_rate: f64,
    pub cb_person_default_on_file: String,
    pub cb_person_cred_hist_length: f64,
    pub person_gender: String,
    pub model_choice: String,
    pub tone: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            person_age: 30.0,
            person_income: 60_000.0,
            person_home_ownership: "RENT".to_string(),
            person_emp_length: 5.0,
            loan_intent: "EDUCATION".to_string(),
            loan_grade: "B".to_string(),
            loan_amnt: 15_000.0,
            loan_int_rate: 11.5,
            cb_person_default_on_file: "N".to_string(),
            cb_person_cred_hist_length: 5.0,
            person_gender: "Male".to_string(),
            model_choice: "xgboost".to_string(),
            tone: "executive".to_string(),
        }
    }
}

impl Profile {
    /// Applies a raw user edit.
    ///
    /// Numeric fields never reject input: anything that does not parse as a
    /// finite float becomes `0`. No range checks happen here.
    pub fn set_field(&mut self, field: ProfileField, raw: &str) -> &mut Self {
        if field.is_numeric() {
            let value = parse_permissive(raw);
            match field {
                ProfileField::Age => self.person_age = value,
                ProfileField::Income => self.person_income = value,
                ProfileField::EmploymentLength => self.person_emp_length = value,
                ProfileField::LoanAmount => self.loan_amnt = value,
                ProfileField::InterestRate => self.loan_int_rate = value,
                ProfileField::CreditHistoryLength => self.cb_person_cred_hist_length = value,
                _ => unreachable!("non-numeric field {field} routed as numeric"),
            }
        } else {
            let value = raw.to_string();
            match field {
                ProfileField::HomeOwnership => self.person_home_ownership = value,
                ProfileField::LoanIntent => self.loan_intent = value,
                ProfileField::LoanGrade => self.loan_grade = value,
                ProfileField::PriorDefault => self.cb_person_default_on_file = value,
                ProfileField::Gender => self.person_gender = value,
                ProfileField::ModelChoice => self.model_choice = value,
                ProfileField::Tone => self.tone = value,
                _ => unreachable!("numeric field {field} routed as text"),
            }
        }
        self
    }

    /// Builder-style variant of [`Profile::set_field`].
    pub fn with_field(mut self, field: ProfileField, raw: &str) -> Self {
        self.set_field(field, raw);
        self
    }

    /// Current value of a numeric field, `None` for categorical ones.
    pub fn numeric(&self, field: ProfileField) -> Option<f64> {
        match field {
            ProfileField::Age => Some(self.person_age),
            ProfileField::Income => Some(self.person_income),
            ProfileField::EmploymentLength => Some(self.person_emp_length),
            ProfileField::LoanAmount => Some(self.loan_amnt),
            ProfileField::InterestRate => Some(self.loan_int_rate),
            ProfileField::CreditHistoryLength => Some(self.cb_person_cred_hist_length),
            _ => None,
        }
    }

    /// Current value of any field, formatted for display.
    pub fn display_value(&self, field: ProfileField) -> String {
        if let Some(value) = self.numeric(field) {
            return value.to_string();
        }
        match field {
            ProfileField::HomeOwnership => self.person_home_ownership.clone(),
            ProfileField::LoanIntent => self.loan_intent.clone(),
            ProfileField::LoanGrade => self.loan_grade.clone(),
            ProfileField::PriorDefault => self.cb_person_default_on_file.clone(),
            ProfileField::Gender => self.person_gender.clone(),
            ProfileField::ModelChoice => self.model_choice.clone(),
            ProfileField::Tone => self.tone.clone(),
            _ => String::new(),
        }
    }
}

/// Parses a float the way the form inputs do: failures and non-finite values become 0.
fn parse_permissive(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

// ============ Decision Service Models ============

/// Outcome label returned by the decision service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Denied,
}

impl Decision {
    pub fn label(self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Denied => "Denied",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A signed feature attribution. Positive weights push towards default risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Feature name as the model sees it.
    pub feature: String,
    /// Signed attribution weight.
    #[serde(rename = "value")]
    pub weight: f64,
}

/// Fairness diffs reported by the service. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FairnessMetrics {
    /// Demographic parity difference.
    pub demographic_parity_diff: Option<f64>,
    /// Equal opportunity difference.
    pub equal_opportunity_diff: Option<f64>,
    /// Treatment equality, shown as "Individual Fairness".
    pub treatment_equality: Option<f64>,
}

/// A single-field change that would move the applicant towards approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Field to change.
    pub feature: String,
    /// Current value of the field.
    pub current: f64,
    /// Suggested value of the field.
    pub suggested: f64,
    /// Human-readable description of the change.
    pub improvement: String,
    /// Predicted probability after the change.
    pub new_prob: f64,
}

/// Counterfactual search output. The service omits fields when the applicant is already approved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counterfactuals {
    /// Probability before any change.
    #[serde(default)]
    pub current_prob: f64,
    /// Ordered recommendations, most useful first.
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// Whether any recommendation reaches approval.
    #[serde(default)]
    pub can_be_approved: bool,
}

fn default_similarity() -> f64 {
    1.0
}

fn default_model_version() -> String {
    "v1.3".to_string()
}

/// Response body of `POST /predict`. Replaced wholesale on every successful request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    /// Decision label.
    pub prediction: Decision,
    /// Default risk probability in `[0, 1]`.
    pub probability: f64,
    /// Model confidence in `[0, 1]`.
    pub confidence_score: f64,
    /// Confidence bucket, free text.
    pub confidence_status: String,
    /// Whether a human should review the decision.
    pub review_required: bool,
    /// Natural-language explanation.
    pub narrative: String,
    /// Attributions in service order.
    #[serde(default)]
    pub contributions: Vec<Contribution>,
    /// Fairness warning text.
    pub fairness_warning: String,
    /// Out-of-distribution flag.
    #[serde(default)]
    pub is_ood: bool,
    /// Similarity to the training distribution in `[0, 1]`.
    #[serde(default = "default_similarity")]
    pub similarity_score: f64,
    /// Fairness diffs, when reported.
    #[serde(default)]
    pub fairness_metrics: Option<FairnessMetrics>,
    /// Remediation paths, when reported.
    #[serde(default)]
    pub counterfactuals: Option<Counterfactuals>,
    /// Calibration score, when reported.
    #[serde(default)]
    pub brier_score: Option<f64>,
    /// Model version string.
    #[serde(default = "default_model_version")]
    pub model_version: String,
}

/// Response body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}
