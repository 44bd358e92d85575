#[inline(always)]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

#[inline(always)]
pub fn unlerp(x: f64, a: f64, b: f64) -> f64 {
    (x - a) / (b - a)
}
