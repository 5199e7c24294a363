use std::fmt::{Display, Formatter};
use std::str::FromStr;

use orgadmin_core::{ClientError, ClientResult, NonEmptyString};

/// Scheme prefix shared by every addressable resource.
pub const RESOURCE_URI_SCHEME: &str = "orgadmin://";

/// Kinds of individually fetchable resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// One project, optionally narrowed to a sub-resource.
    Project,
    /// One organization member.
    Member,
    /// All active projects.
    ActiveProjects,
    /// All current organization members.
    CurrentMembers,
    /// Recent usage summary.
    UsageDashboard,
}

impl ResourceType {
    /// Returns the path segment for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Member => "member",
            Self::ActiveProjects => "active-projects",
            Self::CurrentMembers => "current-members",
            Self::UsageDashboard => "usage-dashboard",
        }
    }

    /// Returns all known resource types.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[ResourceType] = &[
            ResourceType::Project,
            ResourceType::Member,
            ResourceType::ActiveProjects,
            ResourceType::CurrentMembers,
            ResourceType::UsageDashboard,
        ];

        ALL
    }
}

impl FromStr for ResourceType {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|resource_type| resource_type.as_str() == value)
            .ok_or_else(|| ClientError::UnknownResourceType(value.to_owned()))
    }
}

/// Sub-resource kinds nested under a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondaryKind {
    /// Project service account.
    ServiceAccount,
}

impl SecondaryKind {
    /// Returns the path segment for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceAccount => "service-account",
        }
    }
}

/// Address of one fetchable resource, `orgadmin://type/id[/sub/id2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceUri {
    resource_type: ResourceType,
    primary_id: Option<String>,
    secondary_kind: Option<SecondaryKind>,
    secondary_id: Option<String>,
}

impl ResourceUri {
    /// Creates a URI for a type that carries no ids.
    #[must_use]
    pub fn of_type(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            primary_id: None,
            secondary_kind: None,
            secondary_id: None,
        }
    }

    /// Creates a URI addressing one project.
    ///
    /// Fails when the id is blank or contains `/`.
    pub fn project(project_id: impl Into<String>) -> ClientResult<Self> {
        Ok(Self {
            primary_id: Some(path_segment(project_id)?),
            ..Self::of_type(ResourceType::Project)
        })
    }

    /// Creates a URI addressing one service account of a project.
    pub fn project_service_account(
        project_id: impl Into<String>,
        service_account_id: impl Into<String>,
    ) -> ClientResult<Self> {
        Ok(Self {
            secondary_kind: Some(SecondaryKind::ServiceAccount),
            secondary_id: Some(path_segment(service_account_id)?),
            ..Self::project(project_id)?
        })
    }

    /// Creates a URI addressing one organization member.
    pub fn member(user_id: impl Into<String>) -> ClientResult<Self> {
        Ok(Self {
            primary_id: Some(path_segment(user_id)?),
            ..Self::of_type(ResourceType::Member)
        })
    }

    /// Parses `orgadmin://type[/id[/sub[/id2]]]`.
    pub fn parse(raw: &str) -> ClientResult<Self> {
        let path = raw
            .strip_prefix(RESOURCE_URI_SCHEME)
            .ok_or_else(|| ClientError::InvalidUriScheme(raw.to_owned()))?;

        let mut segments = path.split('/');
        let resource_type = segments.next().unwrap_or_default().parse::<ResourceType>()?;
        let rest = segments.collect::<Vec<_>>();

        if rest.iter().any(|segment| segment.is_empty()) {
            return Err(ClientError::InvalidResourcePath(format!(
                "empty path segment in '{raw}'"
            )));
        }

        let too_long = match resource_type {
            ResourceType::Project => rest.len() > 3,
            ResourceType::Member => rest.len() > 1,
            ResourceType::ActiveProjects
            | ResourceType::CurrentMembers
            | ResourceType::UsageDashboard => !rest.is_empty(),
        };
        if too_long {
            return Err(ClientError::InvalidResourcePath(format!(
                "unexpected trailing segments for '{}' in '{raw}'",
                resource_type.as_str()
            )));
        }

        let secondary_kind = match rest.get(1) {
            Some(&segment) if segment == SecondaryKind::ServiceAccount.as_str() => {
                Some(SecondaryKind::ServiceAccount)
            }
            Some(&segment) => {
                return Err(ClientError::InvalidResourcePath(format!(
                    "unknown project sub-resource '{segment}' in '{raw}'"
                )));
            }
            None => None,
        };

        Ok(Self {
            resource_type,
            primary_id: rest.first().map(|segment| (*segment).to_owned()),
            secondary_kind,
            secondary_id: rest.get(2).map(|segment| (*segment).to_owned()),
        })
    }

    /// Formats the URI; the inverse of [`ResourceUri::parse`].
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Returns the resource type.
    #[must_use]
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Returns the primary id, if present.
    #[must_use]
    pub fn primary_id(&self) -> Option<&str> {
        self.primary_id.as_deref()
    }

    /// Returns the sub-resource kind, if present.
    #[must_use]
    pub fn secondary_kind(&self) -> Option<SecondaryKind> {
        self.secondary_kind
    }

    /// Returns the sub-resource id, if present.
    #[must_use]
    pub fn secondary_id(&self) -> Option<&str> {
        self.secondary_id.as_deref()
    }
}

fn path_segment(id: impl Into<String>) -> ClientResult<String> {
    let id = NonEmptyString::new(id)?;
    if id.as_str().contains('/') {
        return Err(ClientError::InvalidResourcePath(format!(
            "resource id '{}' must not contain '/'",
            id.as_str()
        )));
    }

    Ok(id.into())
}

impl Display for ResourceUri {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{RESOURCE_URI_SCHEME}{}",
            self.resource_type.as_str()
        )?;
        if let Some(primary_id) = &self.primary_id {
            write!(formatter, "/{primary_id}")?;
        }
        if let Some(secondary_kind) = &self.secondary_kind {
            write!(formatter, "/{}", secondary_kind.as_str())?;
        }
        if let Some(secondary_id) = &self.secondary_id {
            write!(formatter, "/{secondary_id}")?;
        }

        Ok(())
    }
}

impl FromStr for ResourceUri {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    use orgadmin_core::ClientError;
    use proptest::prelude::*;

    use super::{ResourceType, ResourceUri, SecondaryKind};

    #[test]
    fn literal_uris_roundtrip() {
        for raw in [
            "orgadmin://project",
            "orgadmin://project/proj_123",
            "orgadmin://project/proj_123/service-account",
            "orgadmin://project/proj_123/service-account/sa_1",
            "orgadmin://member",
            "orgadmin://member/user_9",
            "orgadmin://active-projects",
            "orgadmin://current-members",
            "orgadmin://usage-dashboard",
        ] {
            let parsed = ResourceUri::parse(raw);
            assert!(parsed.is_ok(), "{raw} failed to parse");
            assert_eq!(parsed.unwrap_or_else(|_| unreachable!()).serialize(), raw);
        }
    }

    #[test]
    fn captures_project_service_account_segments() {
        let parsed = ResourceUri::parse("orgadmin://project/proj_123/service-account/sa_1");
        assert!(parsed.is_ok());
        let parsed = parsed.unwrap_or_else(|_| unreachable!());
        assert_eq!(parsed.resource_type(), ResourceType::Project);
        assert_eq!(parsed.primary_id(), Some("proj_123"));
        assert_eq!(parsed.secondary_kind(), Some(SecondaryKind::ServiceAccount));
        assert_eq!(parsed.secondary_id(), Some("sa_1"));
        assert_eq!(
            ResourceUri::project_service_account("proj_123", "sa_1").ok(),
            Some(parsed)
        );
    }

    #[test]
    fn constructors_reject_unaddressable_ids() {
        assert!(matches!(
            ResourceUri::project("a/b"),
            Err(ClientError::InvalidResourcePath(_))
        ));
        assert!(matches!(
            ResourceUri::member(""),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            ResourceUri::project_service_account("proj_1", "  "),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            ResourceUri::project_service_account("proj/1", "sa_1"),
            Err(ClientError::InvalidResourcePath(_))
        ));
    }

    #[test]
    fn missing_scheme_is_rejected() {
        assert!(matches!(
            ResourceUri::parse("https://project/proj_123"),
            Err(ClientError::InvalidUriScheme(_))
        ));
        assert!(matches!(
            ResourceUri::parse("project/proj_123"),
            Err(ClientError::InvalidUriScheme(_))
        ));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(matches!(
            ResourceUri::parse("orgadmin://invoice/inv_1"),
            Err(ClientError::UnknownResourceType(value)) if value == "invoice"
        ));
        assert!(matches!(
            ResourceUri::parse("orgadmin://"),
            Err(ClientError::UnknownResourceType(_))
        ));
    }

    #[test]
    fn unusable_paths_are_rejected() {
        for raw in [
            "orgadmin://active-projects/extra",
            "orgadmin://member/user_1/more",
            "orgadmin://project/proj_1/api-key/key_1",
            "orgadmin://project/proj_1/service-account/sa_1/extra",
            "orgadmin://project//service-account",
            "orgadmin://project/proj_1/",
        ] {
            assert!(
                matches!(
                    ResourceUri::parse(raw),
                    Err(ClientError::InvalidResourcePath(_))
                ),
                "{raw} should be rejected"
            );
        }
    }

    fn addressable(id: &str) -> bool {
        !id.trim().is_empty() && !id.contains('/')
    }

    proptest! {
        #[test]
        fn constructed_uris_parse_back(
            resource_type in proptest::sample::select(ResourceType::all().to_vec()),
            first in "[a-z0-9_ /-]{0,8}",
            second in "[a-z0-9_ /-]{0,8}",
        ) {
            let untyped = ResourceUri::of_type(resource_type);
            prop_assert_eq!(ResourceUri::parse(&untyped.serialize()).ok(), Some(untyped));

            let constructed = [
                (ResourceUri::project(first.as_str()), addressable(&first)),
                (ResourceUri::member(first.as_str()), addressable(&first)),
                (
                    ResourceUri::project_service_account(first.as_str(), second.as_str()),
                    addressable(&first) && addressable(&second),
                ),
            ];
            for (uri, valid) in constructed {
                prop_assert_eq!(uri.is_ok(), valid);
                if let Ok(uri) = uri {
                    prop_assert_eq!(ResourceUri::parse(&uri.serialize()).ok(), Some(uri));
                }
            }
        }
    }
}
