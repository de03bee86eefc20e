use thiserror::Error;

/// Errors produced by the Mealie HTTP gateway.
#[derive(Debug, Error)]
pub enum MealieError {
    /// The server answered with a non-success status. The body is kept
    /// verbatim so tool envelopes can surface it unchanged.
    #[error("Mealie API error (HTTP {status_code}): {}", summarize(*.status_code, .response_body))]
    Api {
        status_code: u16,
        response_body: String,
    },

    #[error("failed to reach Mealie: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response from Mealie: {0}")]
    InvalidResponse(String),
}

impl MealieError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MealieError::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub fn response_body(&self) -> Option<&str> {
        match self {
            MealieError::Api { response_body, .. } => Some(response_body),
            _ => None,
        }
    }
}

/// Pull the most useful message out of an error body.
///
/// Mealie (FastAPI) reports validation failures as
/// `{"detail": [{"loc": [...], "msg": "..."}]}` and most other errors as
/// `{"detail": "..."}`; anything else is truncated raw text.
fn summarize(status_code: u16, body: &str) -> String {
    let title = match status_code {
        400 => "bad request",
        401 => "authentication failed",
        403 => "access denied",
        404 => "not found",
        409 => "conflict",
        422 => "validation error",
        500..=599 => "server error",
        _ => "request failed",
    };

    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|parsed| match parsed.get("detail") {
            Some(serde_json::Value::String(msg)) => Some(msg.clone()),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| {
                        let msg = item.get("msg")?.as_str()?;
                        let field = item
                            .get("loc")
                            .and_then(|loc| loc.as_array())
                            .and_then(|loc| loc.last())
                            .and_then(|part| part.as_str());
                        Some(match field {
                            Some(field) => format!("{}: {}", field, msg),
                            None => msg.to_string(),
                        })
                    })
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            _ => None,
        });

    match detail {
        Some(detail) => format!("{} - {}", title, detail),
        None => {
            let mut raw = body.trim().to_string();
            if raw.len() > 200 {
                // Back off to a char boundary so multibyte text can't panic.
                let mut end = 200;
                while !raw.is_char_boundary(end) {
                    end -= 1;
                }
                raw.truncate(end);
            }
            if raw.is_empty() {
                title.to_string()
            } else {
                format!("{} - {}", title, raw)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_exposes_status_and_body() {
        let err = MealieError::Api {
            status_code: 404,
            response_body: "{\"detail\": \"Recipe not found\"}".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert!(err.to_string().contains("Recipe not found"));
    }

    #[test]
    fn validation_errors_name_the_field() {
        let body = r#"{"detail": [{"loc": ["body", "entryType"], "msg": "value is not a valid enumeration member", "type": "type_error.enum"}]}"#;
        let err = MealieError::Api {
            status_code: 422,
            response_body: body.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("validation error"));
        assert!(msg.contains("entryType"));
    }

    #[test]
    fn non_json_bodies_fall_back_to_raw_text() {
        let err = MealieError::Api {
            status_code: 500,
            response_body: "Internal Server Error".to_string(),
        };
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn long_multibyte_bodies_truncate_without_panicking() {
        // A two-byte char straddling the cutoff must not split mid-char.
        let body = format!("{}é and more trailing text", "a".repeat(199));
        let err = MealieError::Api {
            status_code: 500,
            response_body: body,
        };
        let msg = err.to_string();
        assert!(msg.contains("server error"));
        assert!(!msg.contains("é"));

        let all_multibyte = MealieError::Api {
            status_code: 500,
            response_body: "é".repeat(150),
        };
        assert!(all_multibyte.to_string().contains("é"));
    }
}
