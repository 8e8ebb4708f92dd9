//! Voice I/O capability boundary.
//!
//! Speech recognition and synthesis are external collaborators; the core
//! only consumes them. Events arrive on two channels: a partial-transcript
//! stream and a lifecycle stream. Both are notifications only. The session
//! state machine is driven exclusively by explicitly submitted final text,
//! never by a raw partial-transcript event.

use tokio::sync::mpsc::UnboundedSender;

/// Lifecycle notifications from a voice backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    ListeningStarted,
    /// Recognition finished with the final transcript.
    ListeningEnded { transcript: String },
    SpeakingStarted,
    SpeakingEnded,
    Error(String),
}

/// A speech-to-text / text-to-speech provider.
///
/// Callers must check [`is_available`](Self::is_available) and degrade to
/// text-only interaction when it is false; an absent backend never blocks a
/// turn.
pub trait VoiceIo: Send {
    fn is_available(&self) -> bool;

    /// Begin recognition. Interim hypotheses flow on `partials`, start/end/
    /// error notifications on `lifecycle`. Returns false when recognition
    /// could not start.
    fn start_listening(
        &mut self,
        partials: UnboundedSender<String>,
        lifecycle: UnboundedSender<VoiceEvent>,
    ) -> bool;

    fn stop_listening(&mut self);

    /// Speak the given text. Returns false when synthesis is unavailable.
    fn speak(&mut self, text: &str, lifecycle: UnboundedSender<VoiceEvent>) -> bool;

    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
}

/// The no-backend implementation: reports unavailable and refuses every
/// operation, leaving the caller on the text-only path.
#[derive(Debug, Default)]
pub struct NullVoice;

impl VoiceIo for NullVoice {
    fn is_available(&self) -> bool {
        false
    }

    fn start_listening(
        &mut self,
        _partials: UnboundedSender<String>,
        _lifecycle: UnboundedSender<VoiceEvent>,
    ) -> bool {
        false
    }

    fn stop_listening(&mut self) {}

    fn speak(&mut self, _text: &str, _lifecycle: UnboundedSender<VoiceEvent>) -> bool {
        false
    }

    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn stop(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_null_voice_degrades_to_text_only() {
        let mut voice = NullVoice;
        assert!(!voice.is_available());

        let (partials, mut partial_rx) = mpsc::unbounded_channel();
        let (lifecycle, mut lifecycle_rx) = mpsc::unbounded_channel();
        assert!(!voice.start_listening(partials, lifecycle));
        assert!(partial_rx.try_recv().is_err());
        assert!(lifecycle_rx.try_recv().is_err());

        let (lifecycle, _rx) = mpsc::unbounded_channel();
        assert!(!voice.speak("anything", lifecycle));
    }
}
