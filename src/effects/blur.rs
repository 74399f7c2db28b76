use crate::foundation::error::{ClipforgeError, ClipforgeResult};

/// Box blur over a straight-alpha RGBA8 buffer.
///
/// Each output pixel is the mean of every input pixel within `radius` in both
/// axes. The window is clipped to the buffer, so edge pixels average fewer
/// samples. All four channels are blurred.
pub fn box_blur_rgba8(src: &[u8], width: u32, height: u32, radius: u32) -> ClipforgeResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ClipforgeError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(ClipforgeError::render(
            "box_blur_rgba8 expects src matching width*height*4",
        ));
    }
    if radius == 0 || expected_len == 0 {
        return Ok(src.to_vec());
    }

    // Column sums of the vertically clipped window slide down one row at a
    // time; each row is then swept horizontally through a prefix sum. Raw sums
    // avoid double rounding between passes.
    let w = width as usize;
    let h = height as usize;
    let r = (radius as usize).min(w.max(h));
    let mut out = vec![0u8; expected_len];
    let mut col = vec![[0u64; 4]; w];
    let mut prefix = vec![[0u64; 4]; w + 1];

    let add_row = |col: &mut [[u64; 4]], row: usize| {
        for (x, sums) in col.iter_mut().enumerate() {
            let idx = (row * w + x) * 4;
            for c in 0..4 {
                sums[c] += u64::from(src[idx + c]);
            }
        }
    };
    let sub_row = |col: &mut [[u64; 4]], row: usize| {
        for (x, sums) in col.iter_mut().enumerate() {
            let idx = (row * w + x) * 4;
            for c in 0..4 {
                sums[c] -= u64::from(src[idx + c]);
            }
        }
    };

    for row in 0..=r.min(h - 1) {
        add_row(&mut col, row);
    }

    for y in 0..h {
        if y > 0 {
            if y + r < h {
                add_row(&mut col, y + r);
            }
            if y > r {
                sub_row(&mut col, y - r - 1);
            }
        }
        let y0 = y.saturating_sub(r);
        let y1 = (y + r).min(h - 1);
        let rows = (y1 - y0 + 1) as u64;

        for x in 0..w {
            for c in 0..4 {
                prefix[x + 1][c] = prefix[x][c] + col[x][c];
            }
        }

        for x in 0..w {
            let x0 = x.saturating_sub(r);
            let x1 = (x + r).min(w - 1);
            let count = rows * (x1 - x0 + 1) as u64;
            let out_idx = (y * w + x) * 4;
            for c in 0..4 {
                out[out_idx + c] = div_round(prefix[x1 + 1][c] - prefix[x0][c], count);
            }
        }
    }

    Ok(out)
}

fn div_round(sum: u64, count: u64) -> u8 {
    ((sum * 2 + count) / (count * 2)).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
