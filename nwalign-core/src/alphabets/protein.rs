use crate::alphabets::Alphabet;

pub fn alphabet() -> Alphabet {
    Alphabet::new(&b"ARNDCEQGHILKMFPSTWYVarndceqghilkmfpstwyv"[..])
}

/// Standard residues plus the common ambiguity codes and stop.
pub fn iupac_alphabet() -> Alphabet {
    Alphabet::new(&b"ABCDEFGHIKLMNOPQRSTUVWXYZ*abcdefghiklmnopqrstuvwxyz"[..])
}
