use std::io::Write;

use anyhow::Context;
use clap::Parser;
use ssechat_client::{
    ChatConsumer, RelayClient, SessionPhase, Speaker, StreamOutcome, StreamSignal,
    config::ClientConfig, input, logging, transport::pump,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::parse();
    logging::init(config.log_json);

    let client = RelayClient::new(config.server.as_str()).context("building http client")?;
    let mut consumer = ChatConsumer::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    show_prompt()?;
    loop {
        // Ctrl-C aborts a running answer below; at the prompt it quits.
        let interrupt = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        let Some(line) = input::next_line(&mut lines, interrupt)
            .await
            .context("reading stdin")?
        else {
            println!();
            break;
        };
        consumer.set_input(line);
        let Some(request) = consumer.key_enter() else {
            show_prompt()?;
            continue;
        };

        let mut shown = 0;
        let signals = client.open(&request.prompt);
        let interrupted = tokio::select! {
            _ = pump(&mut consumer, request.session, signals, |consumer| {
                render_answer(consumer, &mut shown);
                // A terminal scrolls and keeps focus on its own.
                consumer.take_effects();
            }) => false,
            _ = tokio::signal::ctrl_c() => true,
        };
        if interrupted {
            consumer.on_signal(request.session, StreamSignal::Failed("interrupted".into()));
        }

        if shown > 0 {
            println!();
        }
        match consumer.phase() {
            SessionPhase::Closed(StreamOutcome::Failed(reason)) => {
                eprintln!("[no complete answer: {reason}]");
            }
            SessionPhase::Closed(StreamOutcome::Ended) if shown == 0 => {
                eprintln!("[empty answer]");
            }
            _ => {}
        }
        consumer.take_effects();
        show_prompt()?;
    }

    Ok(())
}

/// Print whatever part of the streaming answer is not on screen yet.
fn render_answer(consumer: &ChatConsumer, shown: &mut usize) {
    let Some(turn) = consumer.transcript().last() else {
        return;
    };
    if turn.speaker != Speaker::Assistant {
        return;
    }

    let mut out = std::io::stdout().lock();
    if *shown == 0 {
        let _ = write!(out, "assistant> ");
    }
    if let Some(fresh) = turn.text.get(*shown..) {
        let _ = write!(out, "{fresh}");
    }
    let _ = out.flush();
    *shown = turn.text.len();
}

fn show_prompt() -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "you> ")?;
    out.flush()?;
    Ok(())
}
