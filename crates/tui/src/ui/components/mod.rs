//! UI components: one per wizard step, the two modals, and the chrome
//! (step indicator, status line, hint bar).

pub mod checkout_modal;
pub mod component;
pub mod confirmation_modal;
pub mod events;
pub mod hint_bar;
pub mod payment;
pub mod personal_info;
pub mod status_line;
pub mod step_indicator;
pub mod text_input;
pub mod ticket;

pub use checkout_modal::CheckoutModalComponent;
pub(crate) use component::Component;
pub use confirmation_modal::RecoveryPromptModal;
pub use events::EventsComponent;
pub use hint_bar::HintBar;
pub use payment::PaymentComponent;
pub use personal_info::PersonalInfoComponent;
pub use status_line::StatusLine;
pub use step_indicator::StepIndicator;
pub use ticket::TicketComponent;
