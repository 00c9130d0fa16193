//! SMILES reader
//!
//! Parsing happens in two steps: a `nom` tokeniser turns the string into a
//! flat token stream, then a builder walks the tokens with a branch stack and
//! a ring-closure table to assemble the [`Molecule`] graph.

use crate::element;
use crate::error::{ChemError, Result};
use crate::molecule::{Atom, Bond, BondOrder, Molecule};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{map, map_res, opt, recognize, value},
    multi::{many0_count, many1_count},
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};
use std::collections::BTreeMap;

// Tokens ==============================================================================================================

#[derive(Debug, Clone, PartialEq)]
struct AtomSpec {
    symbol: String,
    aromatic: bool,
    isotope: Option<u16>,
    /// `Some` for bracket atoms, which carry an explicit hydrogen count
    hydrogens: Option<u8>,
    charge: i8,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Atom(AtomSpec),
    Bond(BondOrder),
    BranchOpen,
    BranchClose,
    Ring(u16),
    Dot,
}

fn token(i: &str) -> IResult<&str, Token> {
    alt((
        map(bracket_atom, Token::Atom),
        map(organic_atom, Token::Atom),
        map(bond, Token::Bond),
        map(ring_number, Token::Ring),
        value(Token::BranchOpen, char('(')),
        value(Token::BranchClose, char(')')),
        value(Token::Dot, char('.')),
    ))(i)
}

/// Organic = "Cl" | "Br" | "B" | "C" | "N" | "O" | "P" | "S" | "F" | "I" | "b" | "c" | "n" | "o" | "p" | "s" ;
fn organic_atom(i: &str) -> IResult<&str, AtomSpec> {
    let aliphatic = map(
        alt((tag("Cl"), tag("Br"), recognize(one_of("BCNOPSFI")))),
        |s: &str| (s.to_string(), false),
    );
    let aromatic = map(recognize(one_of("bcnops")), |s: &str| (s.to_uppercase(), true));
    map(alt((aliphatic, aromatic)), |(symbol, aromatic)| AtomSpec {
        symbol,
        aromatic,
        isotope: None,
        hydrogens: None,
        charge: 0,
    })(i)
}

/// Bracket = "[" , [ Isotope ] , Symbol , [ Chirality ] , [ HCount ] , [ Charge ] , [ Class ] , "]" ;
fn bracket_atom(i: &str) -> IResult<&str, AtomSpec> {
    let isotope = map_res(digit1, str::parse::<u16>);
    let chirality = many1_count(char('@'));
    let hcount = preceded(
        char('H'),
        map(opt(map_res(digit1, str::parse::<u8>)), |n| n.unwrap_or(1)),
    );
    let class = preceded(char(':'), digit1);

    map(
        delimited(
            char('['),
            tuple((opt(isotope), bracket_symbol, opt(chirality), opt(hcount), opt(charge), opt(class))),
            char(']'),
        ),
        |(isotope, (symbol, aromatic), _, hydrogens, charge, _)| AtomSpec {
            symbol,
            aromatic,
            isotope,
            hydrogens: Some(hydrogens.unwrap_or(0)),
            charge: charge.unwrap_or(0),
        },
    )(i)
}

fn bracket_symbol(i: &str) -> IResult<&str, (String, bool)> {
    let aromatic = map(
        alt((tag("se"), tag("as"), tag("te"), recognize(one_of("bcnops")))),
        |s: &str| {
            let mut chars = s.chars();
            let symbol = chars
                .next()
                .map(|c| c.to_ascii_uppercase().to_string() + chars.as_str())
                .unwrap_or_default();
            (symbol, true)
        },
    );
    let aliphatic = map(
        recognize(pair(satisfy(|c| c.is_ascii_uppercase()), opt(satisfy(|c| c.is_ascii_lowercase())))),
        |s: &str| (s.to_string(), false),
    );
    alt((aliphatic, aromatic))(i)
}

/// Charge = ( "+" | "-" ) , Count | { "+" }- | { "-" }- ;
fn charge(i: &str) -> IResult<&str, i8> {
    let (i, sign) = one_of("+-")(i)?;
    let unit: i8 = if sign == '+' { 1 } else { -1 };
    let (i, magnitude) = opt(map_res(digit1, str::parse::<i8>))(i)?;
    match magnitude {
        Some(m) => Ok((i, unit * m)),
        None => {
            let (i, repeated) = map_res(many0_count(char(sign)), |extra| i8::try_from(extra + 1))(i)?;
            Ok((i, unit * repeated))
        }
    }
}

fn bond(i: &str) -> IResult<&str, BondOrder> {
    alt((
        value(BondOrder::Single, one_of("-/\\")),
        value(BondOrder::Double, char('=')),
        value(BondOrder::Triple, char('#')),
        value(BondOrder::Aromatic, char(':')),
    ))(i)
}

/// Ring = digit | "%" , digit , digit ;
fn ring_number(i: &str) -> IResult<&str, u16> {
    let single = map(satisfy(|c| c.is_ascii_digit()), |c| c as u16 - '0' as u16);
    let double = preceded(
        char('%'),
        map_res(
            recognize(pair(satisfy(|c| c.is_ascii_digit()), satisfy(|c| c.is_ascii_digit()))),
            str::parse::<u16>,
        ),
    );
    alt((single, double))(i)
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        let position = input.len() - rest.len();
        match token(rest) {
            Ok((remaining, tok)) => {
                tokens.push((position, tok));
                rest = remaining;
            }
            Err(_) => {
                return Err(ChemError::Syntax {
                    position,
                    reason: format!("unexpected '{}'", rest.chars().next().unwrap_or(' ')),
                })
            }
        }
    }
    Ok(tokens)
}

// Graph Builder =======================================================================================================

struct Builder {
    atoms: Vec<Atom>,
    bracket: Vec<bool>,
    bonds: Vec<Bond>,
}

impl Builder {
    fn add_atom(&mut self, spec: AtomSpec) -> Result<usize> {
        let atomic_number = element::atomic_number(&spec.symbol)
            .ok_or_else(|| ChemError::UnknownElement(spec.symbol.clone()))?;
        if spec.aromatic && !element::can_be_aromatic(atomic_number) {
            return Err(ChemError::UnknownElement(spec.symbol.to_lowercase()));
        }

        self.atoms.push(Atom {
            atomic_number,
            aromatic: spec.aromatic,
            charge: spec.charge,
            isotope: spec.isotope,
            hydrogens: spec.hydrogens.unwrap_or(0),
        });
        self.bracket.push(spec.hydrogens.is_some());
        Ok(self.atoms.len() - 1)
    }

    fn add_bond(&mut self, a: usize, b: usize, order: Option<BondOrder>, position: usize) -> Result<()> {
        if a == b || self.bonds.iter().any(|x| (x.atom1 == a && x.atom2 == b) || (x.atom1 == b && x.atom2 == a)) {
            return Err(ChemError::Syntax {
                position,
                reason: "duplicate or self bond".to_string(),
            });
        }
        let order = order.unwrap_or(if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        });
        self.bonds.push(Bond { atom1: a, atom2: b, order });
        Ok(())
    }

    fn finish(mut self) -> Molecule {
        let mut valence = vec![0u32; self.atoms.len()];
        for bond in &self.bonds {
            valence[bond.atom1] += bond.order.valence();
            valence[bond.atom2] += bond.order.valence();
        }
        for (i, atom) in self.atoms.iter_mut().enumerate() {
            if !self.bracket[i] {
                atom.hydrogens = element::implicit_hydrogens(atom.atomic_number, atom.aromatic, valence[i]);
            }
        }
        Molecule::new(self.atoms, self.bonds)
    }
}

/// Parse a SMILES string into a molecular graph
///
/// Stereo markers (`@`, `/`, `\`) and atom classes are accepted and dropped.
pub fn parse_smiles(input: &str) -> Result<Molecule> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ChemError::Empty);
    }

    let tokens = tokenize(input)?;
    let mut builder = Builder {
        atoms: Vec::new(),
        bracket: Vec::new(),
        bonds: Vec::new(),
    };

    let mut prev: Option<usize> = None;
    let mut pending: Option<BondOrder> = None;
    let mut branches: Vec<Option<usize>> = Vec::new();
    let mut rings: BTreeMap<u16, (usize, Option<BondOrder>)> = BTreeMap::new();

    let syntax = |position: usize, reason: &str| ChemError::Syntax {
        position,
        reason: reason.to_string(),
    };

    for (position, tok) in tokens {
        match tok {
            Token::Atom(spec) => {
                let idx = builder.add_atom(spec)?;
                if let Some(p) = prev {
                    builder.add_bond(p, idx, pending.take(), position)?;
                } else if pending.is_some() {
                    return Err(syntax(position, "bond without a preceding atom"));
                }
                prev = Some(idx);
            }
            Token::Bond(order) => {
                if prev.is_none() || pending.is_some() {
                    return Err(syntax(position, "misplaced bond symbol"));
                }
                pending = Some(order);
            }
            Token::BranchOpen => {
                if prev.is_none() {
                    return Err(syntax(position, "branch without a preceding atom"));
                }
                branches.push(prev);
            }
            Token::BranchClose => {
                if pending.is_some() {
                    return Err(syntax(position, "dangling bond before ')'"));
                }
                prev = branches.pop().ok_or(ChemError::UnbalancedBranch)?;
            }
            Token::Dot => {
                if pending.is_some() || !branches.is_empty() {
                    return Err(syntax(position, "misplaced '.'"));
                }
                prev = None;
            }
            Token::Ring(number) => {
                let atom = prev.ok_or_else(|| syntax(position, "ring bond without an atom"))?;
                let order = pending.take();
                match rings.remove(&number) {
                    Some((other, opening_order)) => {
                        builder.add_bond(other, atom, order.or(opening_order), position)?;
                    }
                    None => {
                        rings.insert(number, (atom, order));
                    }
                }
            }
        }
    }

    if pending.is_some() {
        return Err(syntax(input.len(), "dangling bond at end of input"));
    }
    if !branches.is_empty() {
        return Err(ChemError::UnbalancedBranch);
    }
    if let Some((&number, _)) = rings.iter().next() {
        return Err(ChemError::UnclosedRing(number));
    }

    Ok(builder.finish())
}
