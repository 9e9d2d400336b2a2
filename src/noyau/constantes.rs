// src/noyau/constantes.rs
//
// π et e en décimal fixe (100 décimales, tronquées), calculés une seule fois.

use std::sync::OnceLock;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;

use super::decimal::pow10;

/// Décimales conservées pour π et e.
pub const DECIMALES_CONSTANTES: usize = 100;

// extra pour amortir les erreurs de troncature
const DECIMALES_EXTRA: usize = 10;

/* ------------------------ π (Machin) ------------------------ */

/// arctan(1/q) en entier scalé (troncature) via série:
/// atan(z) = z - z^3/3 + z^5/5 - ...
fn arctan_inv_q_scaled(q: i64, scale: &BigInt) -> BigInt {
    let q = BigInt::from(q);
    let q2 = &q * &q;

    let mut k: u64 = 0;
    let mut sign_pos = true;

    // q^(2k+1)
    let mut q_pow = q;
    let mut sum = BigInt::zero();

    loop {
        let d = &q_pow * BigInt::from(2 * k + 1);
        let term = scale / &d;
        if term.is_zero() {
            break;
        }

        if sign_pos {
            sum += &term;
        } else {
            sum -= &term;
        }

        q_pow *= &q2;
        sign_pos = !sign_pos;
        k += 1;
    }

    sum
}

fn pi_scaled(digits: usize) -> BigInt {
    let scale = pow10((digits + DECIMALES_EXTRA) as u32);

    // Machin : π = 16*atan(1/5) - 4*atan(1/239)
    let a = arctan_inv_q_scaled(5, &scale);
    let b = arctan_inv_q_scaled(239, &scale);

    let pi = BigInt::from(16) * a - BigInt::from(4) * b;
    pi / pow10(DECIMALES_EXTRA as u32)
}

/* ------------------------ e (série des factorielles) ------------------------ */

/// e = Σ 1/k!  (le terme scale/k! est calculé de proche en proche)
fn e_scaled(digits: usize) -> BigInt {
    let scale = pow10((digits + DECIMALES_EXTRA) as u32);

    let mut sum = BigInt::zero();
    let mut term = scale;
    let mut k: u64 = 1;

    while !term.is_zero() {
        sum += &term;
        term /= BigInt::from(k);
        k += 1;
    }

    sum / pow10(DECIMALES_EXTRA as u32)
}

/* ------------------------ Cache ------------------------ */

static PI: OnceLock<BigDecimal> = OnceLock::new();
static E: OnceLock<BigDecimal> = OnceLock::new();

pub fn pi_decimal() -> BigDecimal {
    PI.get_or_init(|| {
        BigDecimal::new(pi_scaled(DECIMALES_CONSTANTES), DECIMALES_CONSTANTES as i64).normalized()
    })
    .clone()
}

pub fn e_decimal() -> BigDecimal {
    E.get_or_init(|| {
        BigDecimal::new(e_scaled(DECIMALES_CONSTANTES), DECIMALES_CONSTANTES as i64).normalized()
    })
    .clone()
}
