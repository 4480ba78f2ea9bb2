use std::fmt;

use serde::Serialize;

use crate::navigation::paths;

/// Account category chosen at sign-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Seeker,
    Agent,
    Landlord,
    Tenant,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Seeker, Role::Agent, Role::Landlord, Role::Tenant];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Seeker => "seeker",
            Role::Agent => "agent",
            Role::Landlord => "landlord",
            Role::Tenant => "tenant",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Seeker => "House Seeker",
            Role::Agent => "Property Agent",
            Role::Landlord => "Property Owner",
            Role::Tenant => "Current Tenant",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Role::Seeker => "Looking for a property to rent",
            Role::Agent => "Manage and list properties",
            Role::Landlord => "Own and rent out properties",
            Role::Tenant => "Already renting a property",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == value.trim())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static role -> landing path lookup with a fallback for roles it does not list.
#[derive(Debug, Clone, Copy)]
pub struct RoleRedirectMap {
    entries: &'static [(&'static str, &'static str)],
    fallback: &'static str,
}

pub const ROLE_REDIRECTS: RoleRedirectMap = RoleRedirectMap {
    entries: &[
        ("admin", paths::ADMIN_DASHBOARD),
        ("agent", paths::AGENT_DASHBOARD),
        ("landlord", paths::AGENT_DASHBOARD),
        ("tenant", paths::TENANT_DASHBOARD),
        ("seeker", paths::HOME),
    ],
    fallback: paths::HOME,
};

impl RoleRedirectMap {
    /// Landing path for a role string as reported by the auth provider.
    pub fn resolve(&self, role: &str) -> &'static str {
        self.lookup(role).unwrap_or(self.fallback)
    }

    pub fn lookup(&self, role: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == role)
            .map(|(_, path)| *path)
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registrable_role_has_an_entry() {
        for role in Role::ALL {
            assert!(
                ROLE_REDIRECTS.lookup(role.as_str()).is_some(),
                "{role} has no redirect entry"
            );
        }
    }

    #[test]
    fn resolves_known_roles() {
        assert_eq!(ROLE_REDIRECTS.resolve("agent"), "/agent/dashboard");
        assert_eq!(ROLE_REDIRECTS.resolve("landlord"), "/agent/dashboard");
        assert_eq!(ROLE_REDIRECTS.resolve("tenant"), "/tenant/dashboard");
        assert_eq!(ROLE_REDIRECTS.resolve("admin"), "/admin/dashboard");
        assert_eq!(ROLE_REDIRECTS.resolve("seeker"), "/");
    }

    #[test]
    fn unknown_roles_fall_back_home() {
        assert_eq!(ROLE_REDIRECTS.resolve("unknown-value"), "/");
        assert_eq!(ROLE_REDIRECTS.resolve(""), "/");
        assert_eq!(ROLE_REDIRECTS.resolve("Agent"), "/");
        assert_eq!(ROLE_REDIRECTS.fallback(), "/");
    }

    #[test]
    fn role_parse_round_trips_wire_values() {
        assert_eq!(Role::parse("landlord"), Some(Role::Landlord));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::default(), Role::Seeker);
    }
}
