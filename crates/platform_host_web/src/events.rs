//! Payload-less DOM event broadcast on `window`.

/// Dispatches a `CustomEvent` named `event_name` with no detail on `window`.
///
/// # Errors
///
/// Returns an error when no window is available or event construction/dispatch fails. On
/// non-wasm targets the call is a successful no-op.
pub fn dispatch_window_event(event_name: &str) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        let event = web_sys::CustomEvent::new(event_name)
            .map_err(|e| format!("CustomEvent `{event_name}` construction failed: {e:?}"))?;
        window
            .dispatch_event(&event)
            .map(|_| ())
            .map_err(|e| format!("dispatch of `{event_name}` failed: {e:?}"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = event_name;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_dispatch_is_noop() {
        dispatch_window_event("notes-updated").expect("dispatch");
    }
}
