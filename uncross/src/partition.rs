use failure::Error;
use log::warn;

use crate::error::ConfigError;

static REST: &str = "rest";

enum PartSpec {
    Absolute(usize),
    Percentage(usize),
    Rest,
}

fn parse_part(part: &str, spec: &str) -> Result<PartSpec, Error> {
    let invalid = || ConfigError::SplitSpecification(spec.to_owned());
    if part == REST {
        Ok(PartSpec::Rest)
    } else if part.ends_with('%') {
        let n = part[..part.len() - 1].parse().map_err(|_| invalid())?;
        Ok(PartSpec::Percentage(n))
    } else if part.ends_with('#') {
        let n = part[..part.len() - 1].parse().map_err(|_| invalid())?;
        Ok(PartSpec::Absolute(n))
    } else {
        Err(invalid().into())
    }
}

/// Compute part sizes from a split specification.
///
/// The specification is a list of parts separated by `_`. Each part is either
///
/// * `N#`: `N` sentences,
/// * `N%`: `N` percent of `size` sentences, rounded half up,
/// * `rest`: all sentences not distributed to other parts, at most once.
///
/// If the parts add up to less than `size`, the remaining sentences are added to the `rest`
/// part. Without a `rest` part they are added to the largest part, the first one in case of a
/// tie.
///
/// Returns `ConfigError` if the specification can't be parsed, uses `rest` more than once or
/// the parts add up to more than `size`.
pub fn parse_split_specification(spec: &str, size: usize) -> Result<Vec<usize>, Error> {
    let invalid = || ConfigError::SplitSpecification(spec.to_owned());
    let mut parts = Vec::new();
    let mut rest_index = None;
    for (idx, part) in spec.split('_').enumerate() {
        match parse_part(part, spec)? {
            PartSpec::Absolute(n) => parts.push(n),
            PartSpec::Percentage(n) => {
                let rounded = n
                    .checked_mul(size)
                    .and_then(|scaled| scaled.checked_add(50))
                    .ok_or_else(invalid)?;
                parts.push(rounded / 100);
            }
            PartSpec::Rest => {
                if rest_index.is_some() {
                    return Err(ConfigError::RepeatedRest.into());
                }
                rest_index = Some(idx);
                parts.push(0);
            }
        }
    }

    let requested = parts
        .iter()
        .try_fold(0usize, |sum, &part| sum.checked_add(part))
        .ok_or_else(invalid)?;
    if requested > size {
        return Err(ConfigError::SplitTooLarge {
            available: size,
            requested,
        }
        .into());
    }

    let diff = size - requested;
    match rest_index {
        Some(idx) => {
            if diff == 0 {
                warn!("Rest part will be empty");
            }
            parts[idx] = diff;
        }
        None if diff > 0 => {
            // safe to unwrap, split always returns at least one part
            let max = *parts.iter().max().unwrap();
            let largest = parts.iter().position(|&part| part == max).unwrap();
            warn!(
                "Rounding: {} extra sentences are added to part {}",
                diff, largest
            );
            parts[largest] += diff;
        }
        None => (),
    }

    Ok(parts)
}

/// Split `items` into consecutive slices of the given sizes.
///
/// Returns `ConfigError::SplitTooLarge` if the sizes add up to more than the number of items.
/// Items after the last part are not part of any slice.
pub fn partition<'a, T>(items: &'a [T], sizes: &[usize]) -> Result<Vec<&'a [T]>, Error> {
    let requested = sizes.iter().fold(0, |sum: usize, &size| sum.saturating_add(size));
    if requested > items.len() {
        return Err(ConfigError::SplitTooLarge {
            available: items.len(),
            requested,
        }
        .into());
    }

    let mut rest = items;
    let mut parts = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let (part, tail) = rest.split_at(size);
        parts.push(part);
        rest = tail;
    }
    Ok(parts)
}
