//! Quote data from the broker API

use log::{error, info};
use serde::{Deserialize, Serialize};

use super::auth::AuthProvider;
use crate::error::BrokerError;

/// A bid/ask pair from the order book
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotePunta {
    pub precio_compra: f64,
    pub precio_venta: f64,
}

/// Quote detail; either order-book pairs or a last traded price is expected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    pub puntas: Option<Vec<QuotePunta>>,
    pub ultimo_precio: Option<f64>,
}

/// Which part of a quote carries usable prices
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceSource {
    Puntas,
    LastPrice(f64),
}

impl QuoteData {
    /// Order-book pairs when present, else a non-zero last price
    pub fn price_source(&self, ticker: &str) -> Result<PriceSource, BrokerError> {
        if self.puntas.as_ref().is_some_and(|puntas| !puntas.is_empty()) {
            return Ok(PriceSource::Puntas);
        }
        match self.ultimo_precio {
            Some(price) if price != 0.0 && !price.is_nan() => {
                info!("Using ultimoPrecio for {} (puntas not available)", ticker);
                Ok(PriceSource::LastPrice(price))
            }
            _ => {
                error!(
                    "No puntas or ultimoPrecio data for {}: puntas={:?} ultimoPrecio={:?}",
                    ticker, self.puntas, self.ultimo_precio
                );
                Err(BrokerError::NoPriceData {
                    ticker: ticker.to_string(),
                })
            }
        }
    }
}

/// Quote detail endpoint for a BCBA-listed ticker
pub fn quote_url(ticker: &str) -> String {
    format!(
        "https://api.invertironline.com/api/v2/bCBA/Titulos/{}/CotizacionDetalle",
        ticker
    )
}

/// Value of the Authorization header for a bearer token
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Transport that fetches quote detail for a ticker
pub trait QuoteSource {
    fn fetch_quote(&self, token: &str, ticker: &str) -> Result<QuoteData, BrokerError>;
}

/// Obtain a token, fetch the quote and check it carries a price
pub fn fetch_validated_quote<A, Q>(
    auth: &mut A,
    source: &Q,
    ticker: &str,
) -> Result<(QuoteData, PriceSource), BrokerError>
where
    A: AuthProvider,
    Q: QuoteSource,
{
    let token = auth.get_token()?;
    info!("Fetching quote for {}...", ticker);
    let quote = source.fetch_quote(&token, ticker)?;
    let price_source = quote.price_source(ticker)?;
    info!("Quote for {} fetched successfully", ticker);
    Ok((quote, price_source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticAuth;

    impl AuthProvider for StaticAuth {
        fn get_token(&mut self) -> Result<String, BrokerError> {
            Ok("tok".to_string())
        }
    }

    struct FixtureSource {
        quotes: HashMap<&'static str, &'static str>,
    }

    impl QuoteSource for FixtureSource {
        fn fetch_quote(&self, token: &str, ticker: &str) -> Result<QuoteData, BrokerError> {
            assert_eq!(bearer_header(token), "Bearer tok");
            match self.quotes.get(ticker) {
                Some(body) => Ok(serde_json::from_str(body).unwrap()),
                None => Err(BrokerError::Http {
                    status: 404,
                    reason: "Not Found".to_string(),
                }),
            }
        }
    }

    fn source() -> FixtureSource {
        let mut quotes = HashMap::new();
        quotes.insert(
            "GGAL",
            r#"{"puntas":[{"cantidadCompra":100,"precioCompra":5120.5,"precioVenta":5130.0,"cantidadVenta":50}],"ultimoPrecio":5125.0}"#,
        );
        quotes.insert("AL30", r#"{"puntas":[],"ultimoPrecio":71250.0}"#);
        quotes.insert("XYZ", r#"{"puntas":null,"ultimoPrecio":0}"#);
        FixtureSource { quotes }
    }

    #[test]
    fn test_parses_wire_names() {
        let quote: QuoteData = serde_json::from_str(
            r#"{"puntas":[{"precioCompra":10.0,"precioVenta":10.5}],"ultimoPrecio":10.2}"#,
        )
        .unwrap();
        assert_eq!(
            quote.puntas,
            Some(vec![QuotePunta {
                precio_compra: 10.0,
                precio_venta: 10.5
            }])
        );
        assert_eq!(quote.ultimo_precio, Some(10.2));

        let empty: QuoteData = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, QuoteData::default());
    }

    #[test]
    fn test_price_source_selection() {
        let mut auth = StaticAuth;
        let source = source();

        let (quote, price_source) = fetch_validated_quote(&mut auth, &source, "GGAL").unwrap();
        assert_eq!(price_source, PriceSource::Puntas);
        assert_eq!(quote.puntas.unwrap()[0].precio_venta, 5130.0);

        let (_, price_source) = fetch_validated_quote(&mut auth, &source, "AL30").unwrap();
        assert_eq!(price_source, PriceSource::LastPrice(71250.0));

        let err = fetch_validated_quote(&mut auth, &source, "XYZ").unwrap_err();
        assert_eq!(err, BrokerError::NoPriceData { ticker: "XYZ".to_string() });

        let err = fetch_validated_quote(&mut auth, &source, "NOPE").unwrap_err();
        assert!(matches!(err, BrokerError::Http { status: 404, .. }));
    }

    #[test]
    fn test_quote_url() {
        assert_eq!(
            quote_url("GGAL"),
            "https://api.invertironline.com/api/v2/bCBA/Titulos/GGAL/CotizacionDetalle"
        );
    }
}
