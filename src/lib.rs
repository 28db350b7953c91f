pub mod config;
pub mod error;
pub mod languages;
pub mod link;
pub mod media;
pub mod provider;
pub mod recognizer;
pub mod session;
pub mod summary;
pub mod transcript;

pub use config::Config;
pub use error::{
    AcquisitionError, LinkError, MalformedMessage, RecognizerError, ServiceError, SessionError,
};
pub use languages::{Language, LANGUAGES};
pub use link::{DataChannelLink, Decoded, FrameSink};
pub use media::{LocalStream, MediaController, MediaSource, SyntheticMediaSource};
pub use provider::{ConnectionProvider, MemoryHub, MemoryProvider, ProviderEvent};
pub use recognizer::{
    RecognizerAdapter, RecognizerEvent, RecognizerFactory, ScriptedRecognizer,
    ScriptedRecognizerFactory, SpeechRecognizer,
};
pub use session::{PeerSession, SessionConfig, SessionEvent, SessionPhase};
pub use summary::{
    HttpSummarizer, Summarizer, SummaryRequest, SummaryRequester, SummaryResponse,
    NOTHING_TO_SUMMARIZE,
};
pub use transcript::{
    chronological, CaptionReset, CaptionTimer, ParticipantId, Side, TranscriptAggregator,
    TranscriptEntry,
};
