use super::Event;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Forward terminal key presses and resizes until cancelled
pub async fn listen(tx: mpsc::Sender<Event>, cancel: CancellationToken) {
    let mut stream = EventStream::new();

    loop {
        let next = tokio::select! {
            () = cancel.cancelled() => {
                tracing::debug!("Input listener cancelled");
                break;
            }
            next = stream.next() => next,
        };

        let event = match next {
            Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => Event::Key(key),
            Some(Ok(CrosstermEvent::Resize(..))) => Event::Resize,
            Some(Ok(_)) => continue,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Terminal input error");
                continue;
            }
            None => break,
        };

        if tx.send(event).await.is_err() {
            // Channel closed, exit
            break;
        }
    }
}
