pub mod attempt_ledger;
pub mod grade_service;
pub mod gradebook_service;
pub mod quiz_service;
pub mod quiz_session;
pub mod scoring_service;
pub mod session_service;
