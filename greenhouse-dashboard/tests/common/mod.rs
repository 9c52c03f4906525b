pub mod recording_transport;
