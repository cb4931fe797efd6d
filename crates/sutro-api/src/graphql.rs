// GraphQL documents and envelopes.
//
// All documents are fixed strings. GraphQL-level `errors` arrays are not
// parsed: a response without `data` is treated like a failed fetch.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::Error;
use crate::transport::log_failure;

/// Production GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.mysutro.com/graphql";

/// Full device/hub/pool/readings/recommendations snapshot.
pub const DATA_QUERY: &str = r"
{
    me {
        id
        firstName
        device {
            serialNumber
            batteryLevel
            temperature
            online
            currentFirmwareVersion
            lidOpen
            coreStatus
            shouldTakeReadings
            chlorineCharges
            bromineCharges
            health
        }
        hub {
            online
            chargerStatus
            ssid
        }
        pool {
            type
            latestReading {
                ph
                alkalinity
                chlorine
                bromine
                readingTime
            }
            latestRecommendations {
                recommendations {
                    id
                    treatment
                    explanation
                    decision
                    completedAt
                    expiredAt
                }
            }
        }
    }
}
";

/// Exchange email/password for a bearer token and minimal profile.
pub const LOGIN_MUTATION: &str = r"
mutation Login($email: String!, $password: String!) {
    login(email: $email, password: $password) {
        token
        user {
            id
            firstName
            pool {
                type
            }
        }
    }
}
";

/// Shared by complete and uncomplete: `completedAt` set vs. null.
pub const COMPLETE_RECOMMENDATION_MUTATION: &str = r"
mutation CompleteRecommendation($recommendationId: ID!, $completedAt: DateTime) {
    completeRecommendation(recommendationId: $recommendationId, completedAt: $completedAt) {
        id
        completedAt
    }
}
";

/// Request body: `{ query, variables? }`.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
}

impl<'a> GraphQlRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            variables: None,
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }
}

/// Response envelope: `{ data: {...} }`.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
}

/// Pull `data` out of a decoded response body.
///
/// A body that does not fit `T` is logged as a parse failure. A body with
/// no `data` (or `data: null`) is logged as missing data. Both give `None`,
/// the same as no response at all.
pub(crate) fn extract_data<T: DeserializeOwned>(url: &Url, body: Value) -> Option<T> {
    match try_extract_data(body) {
        Ok(data) => Some(data),
        Err(err) => {
            log_failure(url, &err);
            None
        }
    }
}

fn try_extract_data<T: DeserializeOwned>(body: Value) -> Result<T, Error> {
    let raw = body.to_string();
    let envelope: GraphQlResponse<T> =
        serde_json::from_value(body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: raw,
        })?;
    envelope.data.ok_or(Error::MissingData)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_omits_absent_variables() {
        let body = serde_json::to_value(GraphQlRequest::new(DATA_QUERY)).unwrap();
        assert!(body.get("variables").is_none());
        assert_eq!(body["query"], DATA_QUERY);
    }

    #[test]
    fn request_keeps_null_variable_values() {
        let body = serde_json::to_value(
            GraphQlRequest::new(COMPLETE_RECOMMENDATION_MUTATION)
                .with_variables(json!({ "recommendationId": "r1", "completedAt": null })),
        )
        .unwrap();
        assert_eq!(body["variables"]["completedAt"], Value::Null);
    }

    #[test]
    fn missing_data_is_classified() {
        let err = try_extract_data::<Value>(json!({ "errors": [{ "message": "boom" }] }))
            .unwrap_err();
        assert!(matches!(err, Error::MissingData));
        assert_eq!(err.category(), "parse");

        let err = try_extract_data::<Value>(json!({ "data": null })).unwrap_err();
        assert!(matches!(err, Error::MissingData));
    }

    #[test]
    fn mismatched_data_is_a_deserialization_failure() {
        let err = try_extract_data::<Vec<String>>(json!({ "data": { "me": 1 } })).unwrap_err();
        assert!(matches!(err, Error::Deserialization { .. }));
    }

    #[test]
    fn missing_data_extracts_to_none() {
        let url = Url::parse(DEFAULT_ENDPOINT).unwrap();
        let data: Option<Value> = extract_data(&url, json!({ "errors": [{ "message": "boom" }] }));
        assert!(data.is_none());
    }
}
