//! Autoplay carousel driven on a paused tokio clock

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use popstore_client::domains::ui::views::carousel::{
    AutoplayCarousel, CarouselConfig, CarouselDriver, CarouselEvent, CarouselHandle,
    ScrollCommand, ScrollSurface,
};
use popstore_client::infra::TokioTimeProvider;

#[derive(Clone, Default)]
struct Surface(Arc<Mutex<Vec<ScrollCommand>>>);

impl ScrollSurface for Surface {
    fn scroll_to(&mut self, command: ScrollCommand) {
        self.0.lock().push(command);
    }
}

impl Surface {
    fn indices(&self) -> Vec<usize> {
        self.0.lock().iter().map(|c| c.index).collect()
    }
}

fn start(items: usize, config: CarouselConfig) -> (CarouselHandle, Surface) {
    let surface = Surface::default();
    let carousel = AutoplayCarousel::new(0..items, config, Arc::new(TokioTimeProvider));
    (CarouselDriver::spawn(carousel, surface.clone()), surface)
}

async fn wait(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn last_item_wraps_to_first() {
    let (handle, surface) = start(5, CarouselConfig::popup_defaults());

    wait(4 * 3000 + 1).await;
    assert_eq!(handle.snapshot().active_index, 4);
    wait(3000).await;
    assert_eq!(handle.snapshot().active_index, 0);
    assert_eq!(surface.indices(), vec![1, 2, 3, 4, 0]);
}

#[tokio::test(start_paused = true)]
async fn touch_and_scroll_hold_autoplay_until_quiet() {
    let (handle, surface) = start(5, CarouselConfig::popup_defaults());

    wait(2900).await;
    handle.send(CarouselEvent::PointerDown);
    for offset in [40.0, 80.0, 120.0] {
        wait(100).await;
        handle.send(CarouselEvent::Scrolled { offset });
    }
    // Past the original 3000ms tick, still inside the debounce window.
    wait(140).await;
    assert!(surface.indices().is_empty());

    // Settles at 3350, so the next tick lands at 6350.
    wait(2900).await;
    assert!(surface.indices().is_empty());
    wait(200).await;
    assert_eq!(surface.indices(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn dot_selection_restarts_interval() {
    let (handle, surface) = start(4, CarouselConfig::popup_defaults());

    wait(2500).await;
    handle.send(CarouselEvent::SelectIndex(2));
    wait(1).await;
    assert_eq!(surface.indices(), vec![2]);

    wait(2900).await;
    assert_eq!(surface.indices(), vec![2]);
    wait(200).await;
    assert_eq!(surface.indices(), vec![2, 3]);
}

#[tokio::test(start_paused = true)]
async fn custom_interval_and_cap_are_honoured() {
    let config = CarouselConfig {
        max_items: 2,
        autoplay_interval: Duration::from_millis(500),
        ..CarouselConfig::popup_defaults()
    };
    let (_handle, surface) = start(6, config);

    wait(2001).await;
    assert_eq!(surface.indices(), vec![1, 0, 1, 0]);
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_tick() {
    let (handle, surface) = start(3, CarouselConfig::popup_defaults());

    wait(2999).await;
    handle.shutdown().await;
    wait(30_000).await;
    assert!(surface.indices().is_empty());
}

#[tokio::test(start_paused = true)]
async fn empty_strip_never_ticks() {
    let (handle, surface) = start(0, CarouselConfig::popup_defaults());
    wait(30_000).await;
    assert!(surface.indices().is_empty());
    assert!(handle.is_running());
}
