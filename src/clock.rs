/// Monotonic microsecond clock.
///
/// All sub-millisecond timing in the driver is a busy-wait against this clock.
/// The counter may wrap; the driver only ever looks at differences computed
/// with [`elapsed_us`].
pub trait Monotonic {
    /// Microseconds since an arbitrary epoch, wrapping at `u32::MAX`.
    fn now_us(&mut self) -> u32;
}

impl<T: Monotonic + ?Sized> Monotonic for &mut T {
    fn now_us(&mut self) -> u32 {
        T::now_us(self)
    }
}

/// Microseconds from `since` to `now`, correct across one counter wrap.
#[inline]
pub fn elapsed_us(since: u32, now: u32) -> u32 {
    now.wrapping_sub(since)
}
