use anyhow::Result;
use std::path::Path;
use vidgen::ark::{Client, Config, RenderOptions, TaskRequest};
use vidgen::{default_context, JobOutcome, PollConfig, Poller};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // The API key comes from ARK_API_KEY or a file pointed at by
    // ARK_API_KEY_FILE.
    let ctx = default_context();
    let config = Config::new().from_env(&ctx);
    let client = Client::new(ctx, config);

    let options = RenderOptions::new()
        .with_resolution("1080p")
        .with_duration_secs(5)
        .with_camera_fixed(false);
    let task = TaskRequest::image_to_video(
        "gen-video-pro",
        "a fox jumps over a frozen lake",
        &options,
        "https://example.com/first_frame.png",
    );
    let poller = Poller::new(PollConfig::new());

    match client
        .run(&task, &poller, Path::new("image_to_video.mp4"))
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
