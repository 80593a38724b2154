//! Line input for the terminal front end.
use std::future::Future;

use tokio::io::{AsyncBufRead, Lines};

/// Next line from `lines`, or `None` on end of input or once `interrupt`
/// resolves first.
pub async fn next_line<R, F>(lines: &mut Lines<R>, interrupt: F) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    F: Future<Output = ()>,
{
    tokio::select! {
        line = lines.next_line() => line,
        _ = interrupt => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};

    #[tokio::test]
    async fn returns_lines_until_end_of_input() {
        let mut lines = BufReader::new(&b"hello\nagain\n"[..]).lines();

        assert_eq!(next_line(&mut lines, std::future::pending()).await.unwrap().as_deref(), Some("hello"));
        assert_eq!(next_line(&mut lines, std::future::pending()).await.unwrap().as_deref(), Some("again"));
        assert_eq!(next_line(&mut lines, std::future::pending()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn interrupt_ends_a_blocked_read() {
        // The writer half stays alive, so the read would wait forever.
        let (_writer, reader) = tokio::io::duplex(64);
        let mut lines = BufReader::new(reader).lines();

        let line = next_line(&mut lines, async {}).await.unwrap();

        assert_eq!(line, None);
    }
}
