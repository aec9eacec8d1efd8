use indicatif::{ProgressBar, ProgressStyle};

/// Byte progress over the (compressed) input file
pub fn create_bytes_progress_bar(total_bytes: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}")
            .expect("Failed to create progress style")
            .progress_chars("#>-")
    );
    pb.set_message(message.to_string());
    pb
}

/// Progress over a sweep of parameter combinations
pub fn create_count_progress_bar(total_items: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_items);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} runs {msg}")
            .expect("Failed to create progress style")
            .progress_chars("#>-")
    );
    pb.set_message(message.to_string());
    pb
}
