use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    User,
    Company,
    Service,
    CompanyService,
    Booking,
    BookingService,
    Analytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    List,
    ListMine,
    Read,
    Update,
    Delete,
    DeleteMine,
    UpdateStatus,
    ListServices,
    ListCompanies,
    SearchByService,
    Report,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Any verified caller.
    Authenticated,
    /// The caller owns the target row, or is an admin.
    OwnerOrAdmin,
    AdminOnly,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resource::User => "user",
            Resource::Company => "company",
            Resource::Service => "service",
            Resource::CompanyService => "company_service",
            Resource::Booking => "booking",
            Resource::BookingService => "booking_service",
            Resource::Analytics => "analytics",
        };
        f.write_str(s)
    }
}

use Action::*;
use Resource as R;
use Rule::*;

/// Every permitted (resource, action) pair. Anything absent is denied.
pub const CAPABILITIES: &[(Resource, Action, Rule)] = &[
    (R::User, Create, AdminOnly),
    (R::User, List, AdminOnly),
    (R::User, Read, AdminOnly),
    (R::User, Update, AdminOnly),
    (R::User, Delete, AdminOnly),
    (R::Company, Create, Authenticated),
    (R::Company, List, Authenticated),
    (R::Company, ListMine, Authenticated),
    (R::Company, Read, Authenticated),
    (R::Company, ListServices, Authenticated),
    (R::Company, Update, OwnerOrAdmin),
    (R::Company, Delete, OwnerOrAdmin),
    (R::Service, Create, Authenticated),
    (R::Service, List, Authenticated),
    (R::Service, ListMine, Authenticated),
    (R::Service, Read, Authenticated),
    (R::Service, ListCompanies, Authenticated),
    (R::Service, Update, OwnerOrAdmin),
    (R::Service, Delete, OwnerOrAdmin),
    // create is checked against the company named in the body
    (R::CompanyService, Create, OwnerOrAdmin),
    (R::CompanyService, List, AdminOnly),
    (R::CompanyService, ListMine, Authenticated),
    (R::CompanyService, Read, AdminOnly),
    (R::CompanyService, Update, OwnerOrAdmin),
    (R::CompanyService, Delete, OwnerOrAdmin),
    (R::Booking, Create, Authenticated),
    (R::Booking, List, AdminOnly),
    (R::Booking, ListMine, Authenticated),
    (R::Booking, Read, OwnerOrAdmin),
    (R::Booking, ListServices, OwnerOrAdmin),
    (R::Booking, Update, AdminOnly),
    (R::Booking, UpdateStatus, AdminOnly),
    (R::Booking, Delete, AdminOnly),
    (R::Booking, DeleteMine, OwnerOrAdmin),
    // create is checked against the booking named in the body
    (R::BookingService, Create, OwnerOrAdmin),
    (R::BookingService, List, AdminOnly),
    (R::BookingService, Read, AdminOnly),
    (R::BookingService, Update, AdminOnly),
    (R::BookingService, Delete, AdminOnly),
    (R::Analytics, SearchByService, Authenticated),
    (R::Analytics, Report, AdminOnly),
];

pub fn rule_for(resource: Resource, action: Action) -> Option<Rule> {
    CAPABILITIES
        .iter()
        .find(|(r, a, _)| *r == resource && *a == action)
        .map(|(_, _, rule)| *rule)
}
