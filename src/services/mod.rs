// Service layer for the marketplace core

pub mod application;
pub mod cascade;
pub mod delegation;
pub mod email;
pub mod forwarding;
pub mod job;
pub mod jwt;
pub mod subscription;
pub mod user;

pub use application::ApplicationService;
pub use cascade::CascadeService;
pub use delegation::{Actor, ActorKind, DelegationService};
pub use email::EmailService;
pub use forwarding::ForwardingService;
pub use job::JobService;
pub use jwt::JwtService;
pub use subscription::SubscriptionService;
pub use user::UserService;
