/// Client-visible failure categories shared by every docgate component.
///
/// Component errors map onto one of these so transports can render them
/// uniformly without knowing each crate's error enum.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    NotFound,
    DuplicateCode,
    DuplicateName,
    UnknownScope,
    UnknownDepartment,
    UnknownUser,
    UnknownField,
    Conflict,
    InvalidCapabilitySet,
    MissingApproverCount,
    InvalidApproverCount,
    InvalidInput,
    Forbidden,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicateCode => "duplicate_code",
            ErrorKind::DuplicateName => "duplicate_name",
            ErrorKind::UnknownScope => "unknown_scope",
            ErrorKind::UnknownDepartment => "unknown_department",
            ErrorKind::UnknownUser => "unknown_user",
            ErrorKind::UnknownField => "unknown_field",
            ErrorKind::Conflict => "conflict",
            ErrorKind::InvalidCapabilitySet => "invalid_capability_set",
            ErrorKind::MissingApproverCount => "missing_approver_count",
            ErrorKind::InvalidApproverCount => "invalid_approver_count",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Forbidden => "forbidden",
        }
    }

    /// HTTP status a transport should use for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::DuplicateCode | ErrorKind::DuplicateName | ErrorKind::Conflict => 409,
            ErrorKind::InvalidInput => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::UnknownScope
            | ErrorKind::UnknownDepartment
            | ErrorKind::UnknownUser
            | ErrorKind::UnknownField
            | ErrorKind::InvalidCapabilitySet
            | ErrorKind::MissingApproverCount
            | ErrorKind::InvalidApproverCount => 422,
        }
    }
}
