//! Response extraction: raw survey records → directed nominations.
//!
//! Each record's payload must be a JSON object keyed by question id. Every
//! `(question, nominee)` pair becomes one [`Nomination`] from the
//! respondent, weighted with the configured default strength and tagged
//! with the relation configured for the question.
//!
//! Extraction never fails. A record with a non-object payload or a blank
//! respondent is skipped whole; an unreadable answer is skipped on its
//! own. Both leave a [`DataWarning`]. Roster membership and
//! self-nominations are checked later, by the graph builder.

use serde_json::Value;
use sociogram_core::{
    Answer, DataWarning, Nomination, ResponseRecord, config::ExtractionConfig,
    model::json_kind,
};
use tracing::{debug, instrument};

/// Turn `records` for `period` into nominations.
///
/// Nominations come out in record order, then question order (sorted by
/// question id), then answer order.
#[instrument(skip(records, config, warnings), fields(records = records.len()))]
pub fn extract_nominations(
    period: &str,
    records: &[ResponseRecord],
    config: &ExtractionConfig,
    warnings: &mut Vec<DataWarning>,
) -> Vec<Nomination> {
    let mut nominations = Vec::new();

    for record in records {
        let respondent = record.respondent_id.trim();
        if respondent.is_empty() {
            warnings.push(DataWarning::MalformedRecord {
                respondent: record.respondent_id.clone(),
                reason: "respondent id is blank".to_string(),
            });
            continue;
        }

        let Value::Object(answers) = &record.responses else {
            warnings.push(DataWarning::MalformedRecord {
                respondent: respondent.to_string(),
                reason: format!(
                    "responses is {}, expected an object of answers",
                    json_kind(&record.responses)
                ),
            });
            continue;
        };

        for (question, raw) in answers {
            let answer = Answer::from_value(raw);
            if let Answer::Malformed(reason) = answer {
                warnings.push(DataWarning::MalformedAnswer {
                    respondent: respondent.to_string(),
                    question: question.clone(),
                    reason,
                });
                continue;
            }

            let relation = config.relation_for(question);
            nominations.extend(answer.nominees().iter().map(|nominee| Nomination {
                nominator: respondent.to_string(),
                nominee: nominee.clone(),
                weight: config.default_strength,
                relation: relation.to_string(),
                period: period.to_string(),
            }));
        }
    }

    debug!(nominations = nominations.len(), "extracted nominations");
    nominations
}
