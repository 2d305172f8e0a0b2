//! Price and volume candles.
//!
//! Exchanges report OHLCV bars in their own shapes; adapters turn them into
//! [`Bar`]s and let [`KLine::from_bars`] produce the canonical, aligned
//! price/volume series.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Most candles a k-line carries.
pub const MAX_CANDLES: usize = 100;

/// Volume candle color for charting consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "rgba(0, 150, 136, 0.5)")]
    Green,
    #[serde(rename = "rgba(255, 82, 82, 0.5)")]
    Red,
}

impl Color {
    /// RGBA literal used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "rgba(0, 150, 136, 0.5)",
            Self::Red => "rgba(255, 82, 82, 0.5)",
        }
    }

    /// Green when the bucket closed at or above its open, red otherwise.
    #[must_use]
    pub fn for_move(open: f64, close: f64) -> Self {
        if close < open {
            Self::Red
        } else {
            Self::Green
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OHLC for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceCandle {
    /// Bucket open time, Unix seconds.
    pub time: i64,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

impl PriceCandle {
    /// Check `low <= open, close <= high`.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [self.open, self.close, self.high, self.low];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(DomainError::InvalidCandle {
                time: self.time,
                reason: "non-finite price",
            });
        }
        if self.low > self.open.min(self.close) {
            return Err(DomainError::InvalidCandle {
                time: self.time,
                reason: "low above open or close",
            });
        }
        if self.high < self.open.max(self.close) {
            return Err(DomainError::InvalidCandle {
                time: self.time,
                reason: "high below open or close",
            });
        }
        Ok(())
    }
}

/// Traded volume for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeCandle {
    /// Bucket open time, Unix seconds.
    pub time: i64,
    /// Volume in the base currency.
    pub value: f64,
    pub color: Color,
}

/// Raw OHLCV bar as reported by an exchange, before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Bucket open time, Unix seconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Aligned price and volume series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KLine {
    pub price_candles: Vec<PriceCandle>,
    pub volume_candles: Vec<VolumeCandle>,
}

impl KLine {
    /// Build the canonical k-line from raw bars.
    ///
    /// Bars may arrive in any order. Duplicate bucket times keep the last
    /// bar seen; only the [`MAX_CANDLES`] most recent buckets are kept.
    ///
    /// # Errors
    ///
    /// Fails if any bar has inconsistent OHLC values.
    pub fn from_bars(bars: impl IntoIterator<Item = Bar>) -> Result<Self, DomainError> {
        let by_time: BTreeMap<i64, Bar> = bars.into_iter().map(|bar| (bar.time, bar)).collect();
        let skip = by_time.len().saturating_sub(MAX_CANDLES);

        let mut kline = Self {
            price_candles: Vec::with_capacity(by_time.len() - skip),
            volume_candles: Vec::with_capacity(by_time.len() - skip),
        };

        for bar in by_time.into_values().skip(skip) {
            let candle = PriceCandle {
                time: bar.time,
                open: bar.open,
                close: bar.close,
                high: bar.high,
                low: bar.low,
            };
            candle.validate()?;

            kline.price_candles.push(candle);
            kline.volume_candles.push(VolumeCandle {
                time: bar.time,
                value: bar.volume,
                color: Color::for_move(bar.open, bar.close),
            });
        }

        Ok(kline)
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.price_candles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.price_candles.is_empty()
    }

    /// Check alignment, ordering, OHLC consistency and colors.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.price_candles.len() != self.volume_candles.len() {
            return Err(DomainError::MisalignedKLine {
                reason: format!(
                    "{} price candles vs {} volume candles",
                    self.price_candles.len(),
                    self.volume_candles.len()
                ),
            });
        }

        for (index, (price, volume)) in self
            .price_candles
            .iter()
            .zip(&self.volume_candles)
            .enumerate()
        {
            price.validate()?;
            if price.time != volume.time {
                return Err(DomainError::MisalignedKLine {
                    reason: format!(
                        "index {index}: price time {} vs volume time {}",
                        price.time, volume.time
                    ),
                });
            }
            if volume.color != Color::for_move(price.open, price.close) {
                return Err(DomainError::MisalignedKLine {
                    reason: format!("index {index}: color does not match candle direction"),
                });
            }
        }

        if let Some(index) = self
            .price_candles
            .windows(2)
            .position(|pair| pair[0].time >= pair[1].time)
        {
            return Err(DomainError::UnorderedSeries {
                series: "price candles",
                index: index + 1,
            });
        }

        Ok(())
    }
}
