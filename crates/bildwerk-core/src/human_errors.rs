// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the editor tabs.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the status line is coloured in the UI.

use crate::error::BildwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network blip or busy service — trying again may work.
    Transient,
    /// User must do something (pick a file, set an API key, download a model).
    ActionRequired,
    /// Cannot be fixed by retrying — damaged file, rejected request.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether pressing Submit again is worthwhile.
    pub retriable: bool,
    /// Severity level (drives colour in UI).
    pub severity: Severity,
}

/// Convert a `BildwerkError` into a `HumanError` for the status line.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    match err {
        BildwerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BildwerkError::InvalidParameter(detail) => HumanError {
            message: "One of the settings isn't valid.".into(),
            suggestion: format!("Check the values on this tab and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::MissingInput(what) => HumanError {
            message: format!("Please choose a {what} first."),
            suggestion: "Use the file picker on this tab, then press Submit again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::Segmentation(_) => HumanError {
            message: "We couldn't separate the subject from its background.".into(),
            suggestion: "Try a photo where the subject stands out clearly from the background.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BildwerkError::ModelUnavailable(detail) => HumanError {
            message: "Background removal isn't set up yet.".into(),
            suggestion: format!("Download the segmentation model and set its path in Settings. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::UpscaleRequest(detail) => humanize_request_error(detail),

        BildwerkError::UpscaleRejected { status, body } => humanize_rejection(*status, body),

        BildwerkError::InvalidImageData(_) => HumanError {
            message: "The upscaling service sent back something that isn't an image.".into(),
            suggestion: "Try again in a moment. If this keeps happening, check the engine in Settings.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BildwerkError::MissingApiKey(var) => HumanError {
            message: "No API key for the upscaling service.".into(),
            suggestion: format!("Set the {var} environment variable and restart Bildwerk."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Bildwerk doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or pick a different output folder in Settings.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BildwerkError::Serialization(_) => HumanError {
            message: "The settings file couldn't be read or written.".into(),
            suggestion: "Try saving your settings again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

/// Transport-level failures talking to the upscale API.
fn humanize_request_error(detail: &str) -> HumanError {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("timed out") || lower.contains("timeout") {
        HumanError {
            message: "The upscaling service didn't respond in time.".into(),
            suggestion: "The service may be busy. Try again in a moment.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else if lower.contains("dns") || lower.contains("connect") {
        HumanError {
            message: "We couldn't reach the upscaling service.".into(),
            suggestion: "Check your internet connection and the API host in Settings.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else {
        HumanError {
            message: "Sending the image for upscaling failed.".into(),
            suggestion: format!("Try again. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}

/// Non-200 answers from the upscale API.
fn humanize_rejection(status: u16, body: &str) -> HumanError {
    match status {
        401 | 403 => HumanError {
            message: "The upscaling service rejected the API key.".into(),
            suggestion: "Check that your API key is correct and still active.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        402 => HumanError {
            message: "Your upscaling account is out of credits.".into(),
            suggestion: "Top up your account, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
        400 | 404 | 413 | 415 | 422 => HumanError {
            message: "The upscaling service can't handle this request.".into(),
            suggestion: format!(
                "The image may be too large, or the engine name may be wrong. ({body})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },
        429 | 500..=599 => HumanError {
            message: "The upscaling service is busy or having problems.".into(),
            suggestion: "Wait a moment and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        _ => HumanError {
            message: "The upscaling service returned an error.".into(),
            suggestion: format!("Status {status}: {body}"),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_background_is_action_required() {
        let human = humanize_error(&BildwerkError::MissingInput("background image"));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.message.contains("background image"));
        assert!(!human.retriable);
    }

    #[test]
    fn unauthorised_upscale_needs_new_key() {
        let err = BildwerkError::UpscaleRejected {
            status: 401,
            body: "invalid api key".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn server_errors_are_transient() {
        let err = BildwerkError::UpscaleRejected {
            status: 503,
            body: "overloaded".into(),
        };
        assert!(humanize_error(&err).retriable);
    }

    #[test]
    fn timeout_is_transient() {
        let err = BildwerkError::UpscaleRequest("operation timed out".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = BildwerkError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
