use std::{collections::BTreeSet, fmt};

use serde::Serialize;

use crate::permission::{Grant, Permission};

/// A named bundle of permissions assigned to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub name: String,
    pub permissions: BTreeSet<Permission>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.insert(permission);
        self
    }

    pub fn grants(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.as_str() == permission)
    }
}

macro_rules! capabilities {
    ($($variant:ident => $name:literal,)+) => {
        /// Permission names the static role table is allowed to reference.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Capability {
            $($variant,)+
        }

        impl Capability {
            pub const ALL: &'static [Capability] = &[$(Capability::$variant,)+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Capability::$variant => $name,)+
                }
            }
        }
    };
}

capabilities! {
    DashboardView => "dashboard.view",
    EmployeesView => "employees.view",
    EmployeesManage => "employees.manage",
    HrView => "hr.view",
    HrEdit => "hr.edit",
    LeavesRequest => "hr.leaves.request",
    LeavesApprove => "hr.leaves.approve",
    LeavesManage => "hr.leaves.manage",
    AttendanceViewOwn => "hr.attendance.view_own",
    AttendanceView => "hr.attendance.view",
    AttendanceManage => "hr.attendance.manage",
    OnboardingManage => "hr.onboarding.manage",
    OffboardingManage => "hr.offboarding.manage",
    PerformanceReview => "hr.performance.review",
    PerformanceManage => "hr.performance.manage",
    SkillsView => "hr.skills.view",
    SkillsManage => "hr.skills.manage",
    SelfServiceView => "hr.self_service.view",
    ProfileView => "hr.profile.view",
    SettingsManage => "settings.manage",
    UsersManage => "users.manage",
}

impl Capability {
    pub fn permission(self) -> Permission {
        Permission::from_static(self.as_str())
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of the static role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticGrant {
    All,
    Only(&'static [Capability]),
}

impl StaticGrant {
    pub fn covers(self, permission: &str) -> bool {
        match self {
            StaticGrant::All => true,
            StaticGrant::Only(list) => list.iter().any(|cap| cap.as_str() == permission),
        }
    }

    pub fn grants(self) -> Vec<Grant> {
        match self {
            StaticGrant::All => vec![Grant::All],
            StaticGrant::Only(list) => list
                .iter()
                .map(|cap| Grant::Named(cap.permission()))
                .collect(),
        }
    }
}

use Capability::*;

const HR_MANAGER: &[Capability] = &[
    DashboardView,
    EmployeesView,
    EmployeesManage,
    HrView,
    HrEdit,
    LeavesManage,
    AttendanceManage,
    OnboardingManage,
    OffboardingManage,
    PerformanceManage,
    SkillsView,
    SkillsManage,
    SelfServiceView,
];

const ADMIN: &[Capability] = &[
    DashboardView,
    EmployeesView,
    EmployeesManage,
    HrView,
    HrEdit,
    LeavesManage,
    AttendanceManage,
    OnboardingManage,
    OffboardingManage,
    PerformanceManage,
    SkillsView,
    SkillsManage,
    SelfServiceView,
    SettingsManage,
    UsersManage,
];

const MANAGER: &[Capability] = &[
    DashboardView,
    EmployeesView,
    HrView,
    LeavesApprove,
    AttendanceView,
    PerformanceReview,
    SkillsView,
    SelfServiceView,
];

const EMPLOYEE: &[Capability] = &[
    DashboardView,
    SelfServiceView,
    ProfileView,
    LeavesRequest,
    AttendanceViewOwn,
];

const USER: &[Capability] = &[DashboardView, ProfileView];

/// Single-role names carried by simple principals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyRole {
    SuperAdmin,
    Admin,
    HrManager,
    Manager,
    Employee,
    User,
}

impl LegacyRole {
    pub const ALL: [LegacyRole; 6] = [
        LegacyRole::SuperAdmin,
        LegacyRole::Admin,
        LegacyRole::HrManager,
        LegacyRole::Manager,
        LegacyRole::Employee,
        LegacyRole::User,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            LegacyRole::SuperAdmin => "super_admin",
            LegacyRole::Admin => "admin",
            LegacyRole::HrManager => "hr_manager",
            LegacyRole::Manager => "manager",
            LegacyRole::Employee => "employee",
            LegacyRole::User => "user",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == value)
    }

    /// Unknown and missing names land in the lowest-privilege bucket.
    pub fn resolve(value: Option<&str>) -> Self {
        value.and_then(Self::from_name).unwrap_or(LegacyRole::User)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, LegacyRole::SuperAdmin | LegacyRole::Admin)
    }

    pub fn grant(self) -> StaticGrant {
        match self {
            LegacyRole::SuperAdmin => StaticGrant::All,
            LegacyRole::Admin => StaticGrant::Only(ADMIN),
            LegacyRole::HrManager => StaticGrant::Only(HR_MANAGER),
            LegacyRole::Manager => StaticGrant::Only(MANAGER),
            LegacyRole::Employee => StaticGrant::Only(EMPLOYEE),
            LegacyRole::User => StaticGrant::Only(USER),
        }
    }
}

impl fmt::Display for LegacyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
