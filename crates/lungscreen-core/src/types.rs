//! Patient symptom input types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A validated yes/no answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Numeric encoding consumed by the models (Yes = 1, No = 0)
    pub fn as_feature(self) -> f64 {
        match self {
            Self::Yes => 1.0,
            Self::No => 0.0,
        }
    }

    pub fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for Answer {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl FromStr for Answer {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("yes") {
            Ok(Self::Yes)
        } else if trimmed.eq_ignore_ascii_case("no") {
            Ok(Self::No)
        } else {
            Err(format!("has value '{}', expected \"Yes\" or \"No\"", s))
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => f.write_str("Yes"),
            Self::No => f.write_str("No"),
        }
    }
}

/// One of the eleven symptoms the models were trained on.
///
/// Declaration order is the canonical feature order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symptom {
    YellowFingers,
    Anxiety,
    PeerPressure,
    ChronicDisease,
    Fatigue,
    Allergy,
    Wheezing,
    Alcohol,
    Coughing,
    SwallowingDifficulty,
    ChestPain,
}

/// Number of symptom answers in a record
pub const SYMPTOM_COUNT: usize = 11;

impl Symptom {
    /// All symptoms in canonical feature order
    pub const ALL: [Symptom; SYMPTOM_COUNT] = [
        Symptom::YellowFingers,
        Symptom::Anxiety,
        Symptom::PeerPressure,
        Symptom::ChronicDisease,
        Symptom::Fatigue,
        Symptom::Allergy,
        Symptom::Wheezing,
        Symptom::Alcohol,
        Symptom::Coughing,
        Symptom::SwallowingDifficulty,
        Symptom::ChestPain,
    ];

    /// Position in the feature vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// Form field name
    pub fn field_name(self) -> &'static str {
        match self {
            Self::YellowFingers => "yellow_fingers",
            Self::Anxiety => "anxiety",
            Self::PeerPressure => "peer_pressure",
            Self::ChronicDisease => "chronic_disease",
            Self::Fatigue => "fatigue",
            Self::Allergy => "allergy",
            Self::Wheezing => "wheezing",
            Self::Alcohol => "alcohol",
            Self::Coughing => "coughing",
            Self::SwallowingDifficulty => "swallowing_difficulty",
            Self::ChestPain => "chest_pain",
        }
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A raw answer as submitted by a form: a boolean or a "Yes"/"No" string.
///
/// Any other JSON value is kept as `Other` so validation can reject it
/// with an encoding error naming the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormAnswer {
    Flag(bool),
    Text(String),
    Other(Value),
}

impl FormAnswer {
    /// Parse into the closed yes/no domain
    pub fn parse(&self) -> std::result::Result<Answer, String> {
        match self {
            Self::Flag(value) => Ok(Answer::from(*value)),
            Self::Text(text) => text.parse(),
            Self::Other(value) => Err(format!(
                "has value {}, expected \"Yes\" or \"No\"",
                value
            )),
        }
    }
}

impl From<bool> for FormAnswer {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for FormAnswer {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Answer> for FormAnswer {
    fn from(value: Answer) -> Self {
        Self::Text(value.to_string())
    }
}

/// Raw symptom form as collected from a patient.
///
/// `gender`, `age`, `smoking` and `shortness_of_breath` are collected by the
/// form but the models were trained without them, so they are never encoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomForm {
    #[serde(default)]
    pub yellow_fingers: Option<FormAnswer>,
    #[serde(default)]
    pub anxiety: Option<FormAnswer>,
    #[serde(default)]
    pub peer_pressure: Option<FormAnswer>,
    #[serde(default, alias = "chronic")]
    pub chronic_disease: Option<FormAnswer>,
    #[serde(default)]
    pub fatigue: Option<FormAnswer>,
    #[serde(default)]
    pub allergy: Option<FormAnswer>,
    #[serde(default)]
    pub wheezing: Option<FormAnswer>,
    #[serde(default)]
    pub alcohol: Option<FormAnswer>,
    #[serde(default)]
    pub coughing: Option<FormAnswer>,
    #[serde(default, alias = "swallowing")]
    pub swallowing_difficulty: Option<FormAnswer>,
    #[serde(default)]
    pub chest_pain: Option<FormAnswer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking: Option<FormAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortness_of_breath: Option<FormAnswer>,
}

impl SymptomForm {
    /// A form with every model symptom answered "No"
    pub fn all_no() -> Self {
        Symptom::ALL
            .iter()
            .fold(Self::default(), |form, s| form.with(*s, Answer::No))
    }

    /// Set the answer for a symptom
    pub fn with(mut self, symptom: Symptom, answer: impl Into<FormAnswer>) -> Self {
        *self.slot_mut(symptom) = Some(answer.into());
        self
    }

    /// Clear the answer for a symptom
    pub fn without(mut self, symptom: Symptom) -> Self {
        *self.slot_mut(symptom) = None;
        self
    }

    /// Raw answer for a symptom, if one was submitted
    pub fn answer(&self, symptom: Symptom) -> Option<&FormAnswer> {
        match symptom {
            Symptom::YellowFingers => self.yellow_fingers.as_ref(),
            Symptom::Anxiety => self.anxiety.as_ref(),
            Symptom::PeerPressure => self.peer_pressure.as_ref(),
            Symptom::ChronicDisease => self.chronic_disease.as_ref(),
            Symptom::Fatigue => self.fatigue.as_ref(),
            Symptom::Allergy => self.allergy.as_ref(),
            Symptom::Wheezing => self.wheezing.as_ref(),
            Symptom::Alcohol => self.alcohol.as_ref(),
            Symptom::Coughing => self.coughing.as_ref(),
            Symptom::SwallowingDifficulty => self.swallowing_difficulty.as_ref(),
            Symptom::ChestPain => self.chest_pain.as_ref(),
        }
    }

    fn slot_mut(&mut self, symptom: Symptom) -> &mut Option<FormAnswer> {
        match symptom {
            Symptom::YellowFingers => &mut self.yellow_fingers,
            Symptom::Anxiety => &mut self.anxiety,
            Symptom::PeerPressure => &mut self.peer_pressure,
            Symptom::ChronicDisease => &mut self.chronic_disease,
            Symptom::Fatigue => &mut self.fatigue,
            Symptom::Allergy => &mut self.allergy,
            Symptom::Wheezing => &mut self.wheezing,
            Symptom::Alcohol => &mut self.alcohol,
            Symptom::Coughing => &mut self.coughing,
            Symptom::SwallowingDifficulty => &mut self.swallowing_difficulty,
            Symptom::ChestPain => &mut self.chest_pain,
        }
    }
}

impl From<&SymptomRecord> for SymptomForm {
    fn from(record: &SymptomRecord) -> Self {
        Symptom::ALL
            .iter()
            .fold(Self::default(), |form, s| form.with(*s, record.get(*s)))
    }
}

/// Validated, immutable symptom record with one answer per model symptom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymptomRecord {
    answers: [Answer; SYMPTOM_COUNT],
}

impl SymptomRecord {
    /// Build from answers in canonical order
    pub fn from_answers(answers: [Answer; SYMPTOM_COUNT]) -> Self {
        Self { answers }
    }

    /// A record with every symptom answered "No"
    pub fn all_no() -> Self {
        Self::from_answers([Answer::No; SYMPTOM_COUNT])
    }

    /// Copy of this record with one answer replaced
    pub fn with(mut self, symptom: Symptom, answer: Answer) -> Self {
        self.answers[symptom.index()] = answer;
        self
    }

    pub fn get(&self, symptom: Symptom) -> Answer {
        self.answers[symptom.index()]
    }

    /// Answers in canonical order
    pub fn answers(&self) -> &[Answer; SYMPTOM_COUNT] {
        &self.answers
    }
}

impl TryFrom<&SymptomForm> for SymptomRecord {
    type Error = Error;

    fn try_from(form: &SymptomForm) -> Result<Self> {
        let mut answers = [Answer::No; SYMPTOM_COUNT];
        for symptom in Symptom::ALL {
            let raw = form
                .answer(symptom)
                .ok_or_else(|| Error::encoding(symptom.field_name(), "is missing"))?;
            answers[symptom.index()] = raw
                .parse()
                .map_err(|reason| Error::encoding(symptom.field_name(), reason))?;
        }
        Ok(Self { answers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_answer_parsing() {
        assert_eq!("Yes".parse::<Answer>().unwrap(), Answer::Yes);
        assert_eq!(" no ".parse::<Answer>().unwrap(), Answer::No);
        assert_eq!("YES".parse::<Answer>().unwrap(), Answer::Yes);
        assert!("maybe".parse::<Answer>().is_err());
        assert!("".parse::<Answer>().is_err());
        assert!("1".parse::<Answer>().is_err());
    }

    #[test]
    fn test_symptom_order_matches_index() {
        for (i, symptom) in Symptom::ALL.iter().enumerate() {
            assert_eq!(symptom.index(), i);
        }
        assert_eq!(Symptom::ALL[0], Symptom::YellowFingers);
        assert_eq!(Symptom::ALL[10], Symptom::ChestPain);
    }

    #[test]
    fn test_form_from_json_with_aliases_and_extras() {
        let json = r#"{
            "yellow_fingers": "Yes",
            "anxiety": true,
            "peer_pressure": "No",
            "chronic": "No",
            "fatigue": false,
            "allergy": "No",
            "wheezing": "No",
            "alcohol": "No",
            "coughing": "Yes",
            "swallowing": "No",
            "chest_pain": "No",
            "gender": "Female",
            "age": 54,
            "smoking": "Yes",
            "shortness_of_breath": "No"
        }"#;

        let form: SymptomForm = serde_json::from_str(json).unwrap();
        let record = SymptomRecord::try_from(&form).unwrap();

        assert_eq!(record.get(Symptom::YellowFingers), Answer::Yes);
        assert_eq!(record.get(Symptom::Anxiety), Answer::Yes);
        assert_eq!(record.get(Symptom::ChronicDisease), Answer::No);
        assert_eq!(record.get(Symptom::Coughing), Answer::Yes);
        assert_eq!(form.age, Some(Value::from(54)));
    }

    #[test]
    fn test_missing_field_is_encoding_error() {
        let form = SymptomForm::all_no().without(Symptom::Wheezing);
        let err = SymptomRecord::try_from(&form).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Encoding);
        match err {
            Error::Encoding { field, .. } => assert_eq!(field, "wheezing"),
            other => panic!("Expected encoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_domain_value_is_encoding_error() {
        let form = SymptomForm::all_no().with(Symptom::ChestPain, "Sometimes");
        let err = SymptomRecord::try_from(&form).unwrap_err();
        assert!(err.to_string().contains("chest_pain"));
        assert!(err.to_string().contains("Sometimes"));
    }

    #[test]
    fn test_non_text_answer_is_encoding_error() {
        for raw in ["1", "[]", "{}", "0.5"] {
            let json = format!(r#"{{"anxiety": {}}}"#, raw);
            let answer: SymptomForm = serde_json::from_str(&json).unwrap();
            let form = SymptomForm {
                anxiety: answer.anxiety,
                ..SymptomForm::all_no()
            };

            match SymptomRecord::try_from(&form).unwrap_err() {
                Error::Encoding { field, reason } => {
                    assert_eq!(field, "anxiety");
                    assert!(reason.contains(raw), "{}", reason);
                }
                other => panic!("Expected encoding error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_out_of_range_unused_fields_are_accepted() {
        let json = r#"{"age": 300, "gender": 1, "smoking": 7}"#;
        let extras: SymptomForm = serde_json::from_str(json).unwrap();
        let form = SymptomForm {
            age: extras.age,
            gender: extras.gender,
            smoking: extras.smoking,
            ..SymptomForm::all_no()
        };

        assert!(SymptomRecord::try_from(&form).is_ok());
    }

    #[test]
    fn test_unused_fields_do_not_affect_record() {
        let mut form = SymptomForm::all_no();
        let baseline = SymptomRecord::try_from(&form).unwrap();

        form.gender = Some(Value::from("Male"));
        form.age = Some(Value::from(-1));
        form.smoking = Some(FormAnswer::from("Yes"));
        form.shortness_of_breath = Some(FormAnswer::from("not sure"));

        assert_eq!(SymptomRecord::try_from(&form).unwrap(), baseline);
    }

    #[test]
    fn test_record_form_conversion_preserves_answers() {
        let record = SymptomRecord::all_no()
            .with(Symptom::Fatigue, Answer::Yes)
            .with(Symptom::Alcohol, Answer::Yes);
        let form = SymptomForm::from(&record);
        assert_eq!(SymptomRecord::try_from(&form).unwrap(), record);
    }
}
