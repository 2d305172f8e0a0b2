use tradeport::domain::{Color, KLine, OrderBook, Trade};

pub fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

/// Asks ascending, bids descending, no empty levels, not crossed, within depth.
pub fn assert_book_invariants(book: &OrderBook, depth: usize) {
    assert!(book.asks.len() <= depth, "asks exceed depth {depth}");
    assert!(book.bids.len() <= depth, "bids exceed depth {depth}");
    assert!(
        book.asks.windows(2).all(|w| w[0].price <= w[1].price),
        "asks not ascending: {:?}",
        book.asks
    );
    assert!(
        book.bids.windows(2).all(|w| w[0].price >= w[1].price),
        "bids not descending: {:?}",
        book.bids
    );
    assert!(
        book.asks.iter().chain(&book.bids).all(|o| o.amount > 0.0 && o.price > 0.0),
        "book holds an empty level"
    );
    if let (Some(ask), Some(bid)) = (book.best_ask(), book.best_bid()) {
        assert!(ask.price > bid.price, "crossed book {ask:?} / {bid:?}");
    }
}

/// Price and volume candles pair up by time and color, oldest first.
pub fn assert_kline_aligned(kline: &KLine) {
    assert_eq!(kline.price_candles.len(), kline.volume_candles.len());
    assert!(kline.len() <= 100);
    for (price, volume) in kline.price_candles.iter().zip(&kline.volume_candles) {
        assert_eq!(price.time, volume.time);
        let expected = if price.close >= price.open {
            Color::Green
        } else {
            Color::Red
        };
        assert_eq!(volume.color, expected, "candle at {}", price.time);
        assert!(price.low <= price.open.min(price.close));
        assert!(price.high >= price.open.max(price.close));
    }
    assert!(kline
        .price_candles
        .windows(2)
        .all(|w| w[0].time < w[1].time));
}

pub fn assert_trades_ordered(trades: &[Trade]) {
    assert!(trades.len() <= 100);
    assert!(trades.windows(2).all(|w| w[0].time <= w[1].time));
}
