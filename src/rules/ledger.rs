//! Resource ledger: paying resource costs from the board or the markets.
//!
//! Each listed unit is taken from the first played tile (in construction
//! order) of the supplying family that still has output. The unit is free
//! to the buyer; if it empties the tile, the tile's owner is awarded. With
//! no board supply, coal and iron are bought from their market. Beer has
//! no market.
//!
//! After every unit is paid for, the spent multiset must equal the required
//! one.

use crate::core::error::ActionError;
use crate::core::player::PlayerId;
use crate::core::record::Recorder;
use crate::core::state::GameState;
use crate::industry::Resource;

/// Recorder target for a market's fill level.
pub(crate) fn market_target(resource: Resource) -> String {
    format!("game.{}_market", resource.to_string().to_lowercase())
}

/// Pay for `sources` in order on behalf of `player`, then check the units
/// spent against `required` as multisets.
///
/// Mutations land on `state` as they happen and are not undone on failure.
pub fn spend_resources(
    state: &mut GameState,
    player: PlayerId,
    sources: &[Resource],
    required: &[Resource],
    rec: &mut Recorder,
) -> Result<(), ActionError> {
    let mut spent = Vec::with_capacity(sources.len());

    for &resource in sources {
        let supplier = state
            .played_industries
            .iter()
            .position(|tile| tile.supplies(resource));

        if let Some(index) = supplier {
            tracing::trace!(%player, %resource, tile = %state.played_industries[index].tile(), "took unit from board");
            state.draw_from_tile(index, rec)?;
        } else {
            let market = state
                .market_mut(resource)
                .ok_or(ActionError::UnbuyableResource { player, resource })?;
            let before = market.level();
            let price = market.buy();
            let moved = market.level() as i32 - before as i32;
            rec.delta(|| market_target(resource), moved);
            tracing::trace!(%player, %resource, price, "bought unit from market");
            state.account_mut(player).adjust_funds(-price, rec)?;
        }
        spent.push(resource);
    }

    let mut wanted = required.to_vec();
    spent.sort_unstable();
    wanted.sort_unstable();
    if spent != wanted {
        return Err(ActionError::ResourceShortfall {
            player,
            spent,
            required: wanted,
        });
    }
    Ok(())
}
