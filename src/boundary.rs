use std::fmt;

/// Non-fatal conditions noticed during a run.
/// These are reported to the user but never abort the update.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The pattern did not match anything in the target file
    NoMatches { pattern: String },
    /// `--pattern`/`--replace` were given but the context has its own rule
    CallerPatchIgnored { context: String },
    /// The replacement template never inserts the resolved version
    MissingPlaceholder { replace: String },
    /// No token was provided, so the push relies on locally configured credentials
    NoPushToken { remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoMatches { pattern } => {
                write!(f, "Pattern '{}' matched nothing in the target file", pattern)
            }
            BoundaryWarning::CallerPatchIgnored { context } => {
                write!(
                    f,
                    "Context '{}' has a built-in rule; --pattern/--replace are ignored",
                    context
                )
            }
            BoundaryWarning::MissingPlaceholder { replace } => {
                write!(
                    f,
                    "Replacement '{}' does not contain {{version}}",
                    replace
                )
            }
            BoundaryWarning::NoPushToken { remote } => {
                write!(
                    f,
                    "No token given; pushing to '{}' with local credentials",
                    remote
                )
            }
        }
    }
}
