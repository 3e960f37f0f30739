use std::fs;
use std::path::PathBuf;

use birthday_core::playlist::playlist_items_url;
use birthday_core::{
    decode_messages, layout_markers, BannerDim, BannerScale, Message, MessageBody, Side,
    BANNER_DIM,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "birthday-cli", version, about = "Authoring tools for the birthday page")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Messages {
        #[command(subcommand)]
        command: MessageCommand,
    },
    Playlist {
        #[command(subcommand)]
        command: PlaylistCommand,
    },
}

#[derive(Subcommand)]
enum MessageCommand {
    Check {
        path: PathBuf,
        #[arg(long, default_value_t = BANNER_DIM.width)]
        banner_width: f64,
        #[arg(long, default_value_t = BANNER_DIM.height)]
        banner_height: f64,
    },
    Layout {
        path: PathBuf,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
    },
}

#[derive(Subcommand)]
enum PlaylistCommand {
    Url {
        playlist_id: String,
        #[arg(long, env = "BIRTHDAY_YT_API_KEY")]
        api_key: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Messages { command } => match command {
            MessageCommand::Check {
                path,
                banner_width,
                banner_height,
            } => {
                let messages = decode_messages(&fs::read_to_string(&path)?)?;
                let banner = BannerDim {
                    width: banner_width,
                    height: banner_height,
                };
                println!("{}: {} messages", path.display(), messages.len());
                let mut warnings = 0;
                for (index, message) in messages.iter().enumerate() {
                    println!("{}", describe_message(index, message, banner));
                    for warning in message_warnings(index, message, banner) {
                        eprintln!("warning: {warning}");
                        warnings += 1;
                    }
                }
                if warnings > 0 {
                    eprintln!("{warnings} warning(s)");
                }
            }
            MessageCommand::Layout {
                path,
                width,
                height,
            } => {
                let messages = decode_messages(&fs::read_to_string(&path)?)?;
                for line in layout_lines(&messages, BANNER_DIM, width, height) {
                    println!("{line}");
                }
            }
        },
        Commands::Playlist { command } => match command {
            PlaylistCommand::Url {
                playlist_id,
                api_key,
            } => {
                println!("{}", playlist_items_url(&playlist_id, &api_key)?);
            }
        },
    }

    Ok(())
}

fn describe_message(index: usize, message: &Message, banner: BannerDim) -> String {
    let side = Side::for_position(message.position.x, banner.width);
    let detail = match &message.body {
        MessageBody::Text { text } => format!("{} chars", text.chars().count()),
        MessageBody::Url { target: Some(target) } => format!("-> #{target}"),
        MessageBody::Url { target: None } => "-> (no target)".to_string(),
    };
    format!(
        "#{index} {name} [{kind}] at ({x}, {y}) overlay {side} {detail}",
        name = message.name,
        kind = message.body.kind(),
        x = message.position.x,
        y = message.position.y,
        side = side.as_str(),
    )
}

fn message_warnings(index: usize, message: &Message, banner: BannerDim) -> Vec<String> {
    let mut warnings = Vec::new();
    let position = message.position;
    if position.x < 0.0 || position.x > banner.width || position.y < 0.0 || position.y > banner.height
    {
        warnings.push(format!(
            "message {index} at ({}, {}) is outside the {}x{} banner",
            position.x, position.y, banner.width, banner.height
        ));
    }
    if message.name.trim().is_empty() {
        warnings.push(format!("message {index} has no name"));
    }
    if message.pfp_url.trim().is_empty() {
        warnings.push(format!("message {index} has no pfp_url"));
    }
    if matches!(message.body, MessageBody::Url { target: None }) {
        warnings.push(format!("message {index} is a url message without a target"));
    }
    warnings
}

fn layout_lines(messages: &[Message], banner: BannerDim, width: f64, height: f64) -> Vec<String> {
    let scale = BannerScale::compute(banner, width, height);
    let mut lines = vec![format!(
        "scale x={:.3} y={:.3} marker={:.1}px",
        scale.x_scale, scale.y_scale, scale.marker_size
    )];
    for (index, layout) in layout_markers(messages, &scale).iter().enumerate() {
        lines.push(format!(
            "pfp-{index}: left={:.1} top={:.1} size={:.1}",
            layout.left, layout.top, layout.size
        ));
    }
    lines
}
