//! Clients for the two speech-to-text services: Watson supplies speaker
//! labels, Whisper supplies the more accurate text.

pub mod watson;
pub mod whisper;
