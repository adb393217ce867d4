use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// `role` is `customer` (default) or `admin`; the latter only when enabled in config.
#[derive(ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub password: String, pub role: Option<String> }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct SessionUserDoc { pub id: Uuid, pub email: String, pub role: String }

#[derive(ToSchema)]
pub struct SessionDoc { pub token: String, pub role: String, pub user: SessionUserDoc }

#[derive(ToSchema)]
pub struct UserDoc { pub id: Uuid, pub name: String, pub email: String, pub role: String, pub created_at: String, pub updated_at: String }

#[derive(ToSchema)]
pub struct UserCreateDoc { pub name: String, pub email: String, pub password: String, pub role: Option<String> }

#[derive(ToSchema)]
pub struct UserUpdateDoc { pub name: Option<String>, pub email: Option<String>, pub password: Option<String>, pub role: Option<String> }

#[derive(ToSchema)]
pub struct CompanyDoc {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct CompanyCreateDoc { pub name: String, pub address: Option<String>, pub description: Option<String> }

/// Absent fields stay unchanged; `null` clears `address` or `description`.
#[derive(ToSchema)]
pub struct CompanyUpdateDoc { pub name: Option<String>, pub address: Option<String>, pub description: Option<String> }

#[derive(ToSchema)]
pub struct ServiceDoc { pub id: Uuid, pub title: String, pub description: Option<String>, pub price: f64, pub created_at: String, pub updated_at: String }

#[derive(ToSchema)]
pub struct ServiceCreateDoc { pub title: String, pub description: Option<String>, pub price: f64, pub company_id: Option<Uuid> }

#[derive(ToSchema)]
pub struct ServiceUpdateDoc { pub title: Option<String>, pub description: Option<String>, pub price: Option<f64> }

#[derive(ToSchema)]
pub struct CompanyServiceDoc { pub id: Uuid, pub company_id: Uuid, pub service_id: Uuid, pub price: Option<f64>, pub created_at: String, pub updated_at: String }

#[derive(ToSchema)]
pub struct CompanyServiceCreateDoc { pub company_id: Uuid, pub service_id: Uuid, pub price: Option<f64> }

#[derive(ToSchema)]
pub struct CompanyServiceUpdateDoc { pub price: Option<f64> }

#[derive(ToSchema)]
pub struct BookingDoc {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub description: Option<String>,
    /// requested | active | completed | cancelled
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct BookingCreateDoc { pub description: Option<String>, pub user_id: Option<Uuid>, pub status: Option<String> }

/// `null` clears `description`.
#[derive(ToSchema)]
pub struct BookingUpdateDoc { pub description: Option<String>, pub status: Option<String>, pub user_id: Option<Uuid> }

#[derive(ToSchema)]
pub struct BookingStatusDoc { pub status: String }

#[derive(ToSchema)]
pub struct BookingServiceDoc {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub company_service_id: Uuid,
    pub notes: Option<String>,
    pub quantity: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct BookingServiceCreateDoc { pub booking_id: Uuid, pub company_service_id: Uuid, pub notes: Option<String>, pub quantity: Option<i32> }

/// `null` clears `notes`.
#[derive(ToSchema)]
pub struct BookingServiceUpdateDoc { pub notes: Option<String>, pub quantity: Option<i32> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::users::create,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::companies::create,
        crate::routes::companies::list,
        crate::routes::companies::list_mine,
        crate::routes::companies::get,
        crate::routes::companies::update,
        crate::routes::companies::delete,
        crate::routes::companies::list_services,
        crate::routes::services::create,
        crate::routes::services::list,
        crate::routes::services::list_mine,
        crate::routes::services::get,
        crate::routes::services::update,
        crate::routes::services::delete,
        crate::routes::services::list_companies,
        crate::routes::company_services::create,
        crate::routes::company_services::list,
        crate::routes::company_services::list_mine,
        crate::routes::company_services::get,
        crate::routes::company_services::update,
        crate::routes::company_services::delete,
        crate::routes::bookings::create,
        crate::routes::bookings::list,
        crate::routes::bookings::list_mine,
        crate::routes::bookings::get,
        crate::routes::bookings::update,
        crate::routes::bookings::delete,
        crate::routes::bookings::delete_mine,
        crate::routes::bookings::update_status,
        crate::routes::bookings::list_services,
        crate::routes::booking_services::create,
        crate::routes::booking_services::list,
        crate::routes::booking_services::get,
        crate::routes::booking_services::update,
        crate::routes::booking_services::delete,
        crate::routes::business::companies_by_service,
        crate::routes::business::users_with_active_bookings,
        crate::routes::business::company_stats,
        crate::routes::business::popular_services,
        crate::routes::business::search,
        crate::routes::business::system_overview,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            SessionUserDoc,
            SessionDoc,
            UserDoc,
            UserCreateDoc,
            UserUpdateDoc,
            CompanyDoc,
            CompanyCreateDoc,
            CompanyUpdateDoc,
            ServiceDoc,
            ServiceCreateDoc,
            ServiceUpdateDoc,
            CompanyServiceDoc,
            CompanyServiceCreateDoc,
            CompanyServiceUpdateDoc,
            BookingDoc,
            BookingCreateDoc,
            BookingUpdateDoc,
            BookingStatusDoc,
            BookingServiceDoc,
            BookingServiceCreateDoc,
            BookingServiceUpdateDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "companies"),
        (name = "services"),
        (name = "company-services"),
        (name = "bookings"),
        (name = "booking-services"),
        (name = "business")
    )
)]
pub struct ApiDoc;
