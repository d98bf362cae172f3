//! Level data failure to HTTP error conversion.

use crate::handler::{Error, ErrorKind};
use crate::service::LevelDataError;

impl From<LevelDataError> for Error<'static> {
    fn from(error: LevelDataError) -> Self {
        match error {
            LevelDataError::FileNotFound { key } => ErrorKind::FileNotFound.with_context(key),
            LevelDataError::UnexpectedMissingBar(err) => {
                ErrorKind::UnexpectedMissingBar.with_context(err.to_string())
            }
            LevelDataError::Internal(err) => {
                ErrorKind::InternalServerError.with_context(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use sekai_core::ParseError;

    use super::*;

    #[test]
    fn maps_each_variant() {
        let not_found = LevelDataError::FileNotFound {
            key: "SusFile/a".to_owned(),
        };
        assert_eq!(Error::from(not_found).kind(), ErrorKind::FileNotFound);

        let missing_bar = LevelDataError::UnexpectedMissingBar(ParseError::other(
            "Unexpected missing bar: line 4",
        ));
        assert_eq!(
            Error::from(missing_bar).kind(),
            ErrorKind::UnexpectedMissingBar
        );

        let internal = LevelDataError::Internal("boom".into());
        let error = Error::from(internal);
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.context(), Some("boom"));
    }
}
