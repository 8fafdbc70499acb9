//! Pieces as stored on the board.
//!
//! A [`Piece`] is a small `Copy` value: its identity, its color and a [`Role`]
//! carrying the per-kind state the rules need. Pieces never store their own
//! square; [`Board::coordinates_of`](crate::Board::coordinates_of) is the only
//! way to locate one.

use chess_core::{Color, PieceKind};

/// Identity of a piece for the lifetime of a board.
///
/// Allocated by the board when the piece is created, so two pawns of the same
/// color are never confused with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) u16);

/// Kind of a piece together with the state only that kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// `moved` gates the two-square advance.
    Pawn { moved: bool },
    Knight,
    Bishop,
    /// `moved` gates castling with this rook.
    Rook { moved: bool },
    Queen,
    /// `moved` gates castling; `in_check` is refreshed after every ply.
    King { moved: bool, in_check: bool },
}

impl Role {
    /// Role of a piece that has not moved yet.
    pub const fn fresh(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Pawn => Role::Pawn { moved: false },
            PieceKind::Knight => Role::Knight,
            PieceKind::Bishop => Role::Bishop,
            PieceKind::Rook => Role::Rook { moved: false },
            PieceKind::Queen => Role::Queen,
            PieceKind::King => Role::King {
                moved: false,
                in_check: false,
            },
        }
    }

    pub const fn kind(self) -> PieceKind {
        match self {
            Role::Pawn { .. } => PieceKind::Pawn,
            Role::Knight => PieceKind::Knight,
            Role::Bishop => PieceKind::Bishop,
            Role::Rook { .. } => PieceKind::Rook,
            Role::Queen => PieceKind::Queen,
            Role::King { .. } => PieceKind::King,
        }
    }
}

/// A piece on (or taken off) the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    color: Color,
    role: Role,
}

impl Piece {
    pub(crate) const fn new(id: PieceId, color: Color, role: Role) -> Self {
        Piece { id, color, role }
    }

    #[inline]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.role.kind()
    }

    /// Returns true if both values denote the same physical piece, whatever their flags.
    #[inline]
    pub fn is(&self, other: &Piece) -> bool {
        self.id == other.id
    }

    /// Whether the piece has moved; kinds without a flag always report `false`.
    pub const fn has_moved(&self) -> bool {
        match self.role {
            Role::Pawn { moved } | Role::Rook { moved } | Role::King { moved, .. } => moved,
            Role::Knight | Role::Bishop | Role::Queen => false,
        }
    }

    /// Sets the moved flag on kinds that carry one.
    pub fn set_moved(&mut self, value: bool) {
        match &mut self.role {
            Role::Pawn { moved } | Role::Rook { moved } | Role::King { moved, .. } => {
                *moved = value
            }
            Role::Knight | Role::Bishop | Role::Queen => {}
        }
    }

    /// Whether this is a king currently flagged as in check.
    pub const fn in_check(&self) -> bool {
        matches!(self.role, Role::King { in_check: true, .. })
    }

    /// Updates the check flag; ignored for anything but a king.
    pub fn set_in_check(&mut self, value: bool) {
        if let Role::King { in_check, .. } = &mut self.role {
            *in_check = value;
        }
    }

    /// Placement letter: upper case for White, lower case for Black.
    pub fn symbol(&self) -> char {
        let letter = self.kind().letter();
        match self.color {
            Color::White => letter,
            Color::Black => letter.to_ascii_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_roles_are_unmoved() {
        for kind in PieceKind::ALL {
            let piece = Piece::new(PieceId(0), Color::White, Role::fresh(kind));
            assert_eq!(piece.kind(), kind);
            assert!(!piece.has_moved());
            assert!(!piece.in_check());
        }
    }

    #[test]
    fn moved_flag_only_on_pawn_rook_king() {
        let mut rook = Piece::new(PieceId(1), Color::Black, Role::fresh(PieceKind::Rook));
        rook.set_moved(true);
        assert!(rook.has_moved());
        rook.set_moved(false);
        assert!(!rook.has_moved());

        let mut knight = Piece::new(PieceId(2), Color::Black, Role::Knight);
        knight.set_moved(true);
        assert!(!knight.has_moved());
    }

    #[test]
    fn check_flag_only_on_king() {
        let mut king = Piece::new(PieceId(3), Color::White, Role::fresh(PieceKind::King));
        king.set_in_check(true);
        assert!(king.in_check());

        let mut queen = Piece::new(PieceId(4), Color::White, Role::Queen);
        queen.set_in_check(true);
        assert!(!queen.in_check());
    }

    #[test]
    fn identity_ignores_flags() {
        let pawn = Piece::new(PieceId(5), Color::White, Role::fresh(PieceKind::Pawn));
        let mut moved = pawn;
        moved.set_moved(true);
        assert!(pawn.is(&moved));
        assert_ne!(pawn, moved);

        let twin = Piece::new(PieceId(6), Color::White, Role::fresh(PieceKind::Pawn));
        assert!(!pawn.is(&twin));
    }

    #[test]
    fn symbols() {
        let white = Piece::new(PieceId(7), Color::White, Role::Knight);
        let black = Piece::new(PieceId(8), Color::Black, Role::Queen);
        assert_eq!(white.symbol(), 'N');
        assert_eq!(black.symbol(), 'q');
    }
}
