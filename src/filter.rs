use anyhow::{bail, Result};

use crate::cli::DEFAULT_MAX_ID;

/// Resolves which ids to fetch from the range/list options
pub fn resolve_ids(
    from: Option<u32>,
    to: Option<u32>,
    ids: Option<Vec<u32>>,
) -> Result<Vec<u32>> {
    match (ids, from, to) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            bail!("Cannot use --ids together with --from/--to");
        }
        (Some(mut ids), None, None) => {
            if ids.contains(&0) {
                bail!("Pokémon ids start at 1");
            }
            // Keep first occurrence order
            let mut seen = std::collections::HashSet::new();
            ids.retain(|id| seen.insert(*id));
            Ok(ids)
        }
        (None, from, to) => {
            let from = from.unwrap_or(1);
            let to = to.unwrap_or(DEFAULT_MAX_ID);
            if from == 0 {
                bail!("Pokémon ids start at 1");
            }
            if from > to {
                bail!("Empty range: --from {} is after --to {}", from, to);
            }
            Ok((from..=to).collect())
        }
    }
}
