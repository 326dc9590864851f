pub mod confirmation;

pub use confirmation::LogConfirmationSender;
