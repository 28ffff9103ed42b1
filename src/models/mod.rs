pub mod application;
pub mod forwarded_cv;
pub mod job;
pub mod plan;
pub mod sub_employer;
pub mod subscription;
pub mod user;

// Re-export common types
pub use application::{
    Application, ApplicationResponse, ApplicationStatus, Meeting, NewApplication,
    ScheduleMeetingRequest, TransitionRequest,
};
pub use forwarded_cv::{
    ForwardApplicationRequest, ForwardedCv, ForwardedCvResponse, ForwardingActionRequest,
    ForwardingStatus, NewForwardedCv,
};
pub use job::{CreateJobRequest, Job, JobResponse, NewJob};
pub use plan::{BillingPeriod, Plan};
pub use sub_employer::{
    CreateSubEmployerRequest, DashboardPermission, NewSubEmployer, SubEmployer,
    SubEmployerResponse,
};
pub use subscription::{
    NewSubscription, RenewSubscriptionRequest, Subscription, SubscriptionResponse,
};
pub use user::{NewUser, RegisterEmployerRequest, User, UserResponse, UserRole};
