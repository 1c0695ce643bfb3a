//! The emitter task: snapshots the merged state and pushes complete frames
//! into the input sink at a fixed cadence.

use std::sync::Arc;

use railpad_wire::Button;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::sink::{Axis, InputSink};
use crate::state::{ControllerFrame, SharedControllerState};

/// Expand a snapshot into the full per-button and per-axis form the sink
/// expects. Every button and axis appears in every frame.
pub fn expand_frame(frame: &ControllerFrame) -> ([(Button, bool); 24], [(Axis, u8); 4]) {
    let mut buttons = [(Button::Y, false); 24];
    for (slot, &button) in buttons.iter_mut().zip(Button::ALL.iter()) {
        *slot = (button, button.is_set(frame.buttons));
    }
    let axes = [
        (Axis::LeftX, frame.left_stick.0),
        (Axis::LeftY, frame.left_stick.1),
        (Axis::RightX, frame.right_stick.0),
        (Axis::RightY, frame.right_stick.1),
    ];
    (buttons, axes)
}

/// Emit merged frames until cancelled.
///
/// Emission is unconditional: a tick with no attached session still
/// produces a neutral frame. The sink call is synchronous and the frame is
/// complete once it returns.
pub async fn run_emitter<S: InputSink>(
    state: Arc<SharedControllerState>,
    sink: Arc<S>,
    handle: S::Handle,
    interval: std::time::Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
        let (buttons, axes) = expand_frame(&state.snapshot());
        sink.emit(&handle, &buttons, &axes);
    }
    debug!("emitter stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AXIS_NEUTRAL;

    #[test]
    fn expand_covers_every_button_once() {
        let frame = ControllerFrame {
            buttons: Button::A.bit() | Button::Down.bit(),
            left_stick: (10, 20),
            right_stick: (30, 40),
        };
        let (buttons, axes) = expand_frame(&frame);

        assert_eq!(buttons.len(), Button::ALL.len());
        for (button, pressed) in buttons {
            let expected = button == Button::A || button == Button::Down;
            assert_eq!(pressed, expected, "{button:?}");
        }
        assert_eq!(axes[0], (Axis::LeftX, 10));
        assert_eq!(axes[3], (Axis::RightY, 40));
    }

    #[test]
    fn expand_neutral_frame() {
        let frame = ControllerFrame {
            buttons: 0,
            left_stick: (AXIS_NEUTRAL, AXIS_NEUTRAL),
            right_stick: (AXIS_NEUTRAL, AXIS_NEUTRAL),
        };
        let (buttons, axes) = expand_frame(&frame);
        assert!(buttons.iter().all(|&(_, pressed)| !pressed));
        assert!(axes.iter().all(|&(_, value)| value == AXIS_NEUTRAL));
    }
}
