pub mod fondo_ambiente;

pub use fondo_ambiente::FondoAmbienteClient;
