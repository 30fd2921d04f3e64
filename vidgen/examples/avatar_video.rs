use anyhow::Result;
use std::path::Path;
use vidgen::cv::{Client, Config, TaskRequest};
use vidgen::{default_context, JobOutcome, PollConfig, Poller};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // Credentials come from VOLC_ACCESS_KEY_ID / VOLC_SECRET_ACCESS_KEY or
    // a key file pointed at by VOLC_KEY_FILE.
    let ctx = default_context();
    let config = Config::new().from_env(&ctx);
    let client = Client::new(ctx, config);

    // Inputs must already be publicly fetchable.
    let task = TaskRequest::avatar_video(
        "https://example.com/subject.png",
        "https://example.com/voice.wav",
    );
    let poller = Poller::new(PollConfig::new());

    match client
        .run(&task, &poller, Path::new("avatar_video.mp4"))
        .await?
    {
        JobOutcome::Downloaded { path, bytes } => {
            println!("saved {} ({bytes} bytes)", path.display())
        }
        JobOutcome::Completed(artifact) => println!("completed without artifact: {artifact:?}"),
        JobOutcome::Failed(reason) => println!("job failed: {reason}"),
    }

    Ok(())
}
