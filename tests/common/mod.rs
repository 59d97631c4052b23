use std::time::Duration;

/// Poll a condition until it holds, or fail the test after a second
pub async fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
	for _ in 0..200 {
		if condition() {
			return;
		}
		tokio::time::sleep(Duration::from_millis(5)).await;
	}
	panic!("timed out waiting for {what}");
}
