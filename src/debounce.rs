/// Trailing-edge debounce module
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Holds pushed values back until no newer value has arrived for the
/// configured delay; only that last value is forwarded.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Queue a value, restarting the quiet window.
    /// Returns `false` once the receiving side has gone away.
    pub fn push(&self, value: T) -> bool {
        self.input.send(value).is_ok()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a debouncer; settled values come out of the returned receiver
pub fn debounce<T: Send + 'static>(delay: Duration) -> (Debouncer<T>, mpsc::UnboundedReceiver<T>) {
    let (input, mut rx) = mpsc::unbounded_channel::<T>();
    let (output, settled) = mpsc::unbounded_channel::<T>();

    let task = tokio::spawn(async move {
        let mut pending: Option<T> = None;
        loop {
            match pending.take() {
                None => match rx.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                },
                Some(value) => {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(newer) => pending = Some(newer),
                            None => {
                                let _ = output.send(value);
                                break;
                            }
                        },
                        _ = tokio::time::sleep(delay) => {
                            if output.send(value).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        }
    });

    (Debouncer { input, task }, settled)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_fast_keystrokes_emit_only_last() {
        let (debouncer, mut settled) = debounce(WINDOW);
        for term in ["m", "ma", "mar", "mart"] {
            debouncer.push(term.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(WINDOW * 2).await;

        assert_eq!(settled.recv().await.as_deref(), Some("mart"));
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_keystrokes_each_emit() {
        let (debouncer, mut settled) = debounce(WINDOW);
        for term in ["venus", "tierra"] {
            debouncer.push(term.to_string());
            tokio::time::sleep(WINDOW + Duration::from_millis(50)).await;
        }

        assert_eq!(settled.recv().await.as_deref(), Some("venus"));
        assert_eq!(settled.recv().await.as_deref(), Some("tierra"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_emitted_inside_window() {
        let (debouncer, mut settled) = debounce(WINDOW);
        debouncer.push(1u32);
        tokio::time::sleep(WINDOW / 2).await;
        assert!(settled.try_recv().is_err());

        tokio::time::sleep(WINDOW).await;
        assert_eq!(settled.try_recv().ok(), Some(1));
    }
}
