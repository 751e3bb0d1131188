//! Feature encoding: symptom answers to the fixed-order model input

use lungscreen_core::{
    FeatureVector, Result, Symptom, SymptomForm, SymptomRecord, FEATURE_COUNT, INTERACTION_INDEX,
};

/// Maps symptom records to the 12-element vector the models were trained on.
///
/// Layout: the eleven symptoms as 0/1 in [`Symptom::ALL`] order, then
/// `yellow_fingers * anxiety`.
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Validate a raw form and encode it.
    ///
    /// Fails with [`lungscreen_core::Error::Encoding`] naming the first
    /// missing or out-of-domain field.
    pub fn encode(form: &SymptomForm) -> Result<FeatureVector> {
        let record = SymptomRecord::try_from(form)?;
        Ok(Self::encode_record(&record))
    }

    /// Encode an already validated record
    pub fn encode_record(record: &SymptomRecord) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        for symptom in Symptom::ALL {
            values[symptom.index()] = record.get(symptom).as_feature();
        }
        values[INTERACTION_INDEX] =
            values[Symptom::YellowFingers.index()] * values[Symptom::Anxiety.index()];
        FeatureVector::new(values)
    }
}
