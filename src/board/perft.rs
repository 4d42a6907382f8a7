/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color};

/// Perform a perft at the specified depth, with `color` to move, collecting only the number of reachable positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
#[inline(always)]
pub fn perft(board: &Board, color: Color, depth: usize) -> u64 {
    perft_generic::<true, false>(board, color, depth)
}

/// Perform a splitperft at the specified depth, printing the number of nodes reachable after each root move.
#[inline(always)]
pub fn splitperft(board: &Board, color: Color, depth: usize) -> u64 {
    perft_generic::<true, true>(board, color, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(
    board: &Board,
    color: Color,
    depth: usize,
) -> u64 {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return 1;
    }

    let moves = board.all_legal_moves(color);

    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return moves.len() as u64;
    }

    moves.into_iter().fold(0, |nodes, mv| {
        let new_nodes =
            perft_generic::<BULK, false>(&board.with_move_made(&mv), color.opponent(), depth - 1);

        if SPLIT {
            println!("{mv}\t{new_nodes}");
        }

        nodes + new_nodes
    })
}
