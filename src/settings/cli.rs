use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "tavern", about = "Social backend core: friendships and chats")]
pub struct Cli {
    /// Path to a settings file, overriding the build-profile default.
    #[arg(long)]
    pub settings: Option<String>,
}
