//! Response assembly for cars.

use std::{collections::BTreeMap, fmt, sync::Arc};

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    cars::{
        models::{Car, CarPage},
        records::CarId,
    },
    exchange_rates::{
        Conversion, ConversionOutcome, Currency, ExchangeRates, ExchangeRatesService,
        ExchangeRatesServiceExt,
    },
    photos::{PhotoId, PhotoRecord},
};

/// A photo as shown to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoView {
    pub id: PhotoId,
    pub photo_path: String,
    pub thumbnail_path: Option<String>,
    pub is_primary: bool,
}

impl From<&PhotoRecord> for PhotoView {
    fn from(photo: &PhotoRecord) -> Self {
        Self {
            id: photo.id,
            photo_path: photo.photo_path.clone(),
            thumbnail_path: photo.thumbnail_path.clone(),
            is_primary: photo.is_primary,
        }
    }
}

/// A car priced in the display currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarView {
    pub id: CarId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    pub description: Option<String>,
    pub display_currency: Currency,
    pub original_price: Decimal,
    pub base_currency: Currency,
    pub display_price: Decimal,
    pub price_conversion: ConversionOutcome,
    pub primary_photo_path: Option<String>,
    pub primary_thumbnail_path: Option<String>,
    pub photos: Vec<PhotoView>,
    pub options: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarPageView {
    pub data: Vec<CarView>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u64,
    pub display_currency: Currency,
    pub rates: BTreeMap<Currency, Option<f64>>,
}

#[derive(Clone)]
pub struct CarPresenter {
    rates: Arc<dyn ExchangeRatesService>,
    default_display_currency: Currency,
}

impl fmt::Debug for CarPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarPresenter")
            .field("default_display_currency", &self.default_display_currency)
            .finish_non_exhaustive()
    }
}

impl CarPresenter {
    #[must_use]
    pub fn new(rates: Arc<dyn ExchangeRatesService>, default_display_currency: Currency) -> Self {
        Self {
            rates,
            default_display_currency,
        }
    }

    /// The requested code when it is supported, otherwise the default.
    #[must_use]
    pub fn resolve_display_currency(&self, requested: Option<&str>) -> Currency {
        requested
            .and_then(|code| code.parse().ok())
            .unwrap_or(self.default_display_currency)
    }

    pub async fn present_car(&self, car: &Car, requested: Option<&str>) -> CarView {
        let display = self.resolve_display_currency(requested);
        let rates = self.rates_for(display).await;

        self.view(car, display, &rates).await
    }

    /// Present a page, loading rates once for all of its cars.
    pub async fn present_page(&self, page: &CarPage, requested: Option<&str>) -> CarPageView {
        let display = self.resolve_display_currency(requested);
        let rates = self.rates.get_rates().await;

        let mut data = Vec::with_capacity(page.cars.len());

        for car in &page.cars {
            data.push(self.view(car, display, &rates).await);
        }

        CarPageView {
            data,
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            last_page: page.last_page(),
            display_currency: display,
            rates: self.rates.format_rates_for_frontend(&rates),
        }
    }

    async fn rates_for(&self, display: Currency) -> ExchangeRates {
        if display == self.rates.base_currency() {
            ExchangeRates::default()
        } else {
            self.rates.get_rates().await
        }
    }

    async fn view(&self, car: &Car, display: Currency, rates: &ExchangeRates) -> CarView {
        let Conversion { amount, outcome } = self
            .rates
            .convert(Some(car.price), display, Some(rates))
            .await
            .unwrap_or(Conversion {
                amount: car.price,
                outcome: ConversionOutcome::Degraded,
            });

        let primary = car.primary_photo().or_else(|| car.photos.first());

        CarView {
            id: car.id,
            brand: car.brand.clone(),
            model: car.model.clone(),
            year: car.year,
            price: car.price,
            description: car.description.clone(),
            display_currency: display,
            original_price: car.price,
            base_currency: self.rates.base_currency(),
            display_price: amount,
            price_conversion: outcome,
            primary_photo_path: primary.map(|photo| photo.photo_path.clone()),
            primary_thumbnail_path: primary.and_then(|photo| photo.thumbnail_path.clone()),
            photos: car.photos.iter().map(PhotoView::from).collect(),
            options: car.option_names().map(str::to_owned).collect(),
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{
        cars::models::CARS_PER_PAGE,
        exchange_rates::MockExchangeRatesService,
        options::OptionRecord,
    };

    use super::*;

    fn photo(id: i64, is_primary: bool) -> PhotoRecord {
        PhotoRecord {
            id: PhotoId::from_i64(id),
            car_id: CarId::from_i64(1),
            photo_path: format!("cars/1/{id}.jpg"),
            thumbnail_path: Some(format!("cars/thumbnails/{id}_abc123/640x360.jpg")),
            is_primary,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn car(id: i64, price: Decimal) -> Car {
        Car {
            id: CarId::from_i64(id),
            brand: "Skoda".to_string(),
            model: "Octavia".to_string(),
            year: 2021,
            price,
            description: None,
            photos: vec![photo(2, true), photo(1, false)],
            options: vec![OptionRecord {
                id: crate::domain::options::OptionId::from_i64(1),
                name: "Bluetooth".to_string(),
            }],
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn market() -> ExchangeRates {
        [(Currency::Uah, 1.0), (Currency::Usd, 37.0), (Currency::Eur, 40.0)]
            .into_iter()
            .collect()
    }

    fn rates_service(expected_fetches: usize) -> MockExchangeRatesService {
        let mut service = MockExchangeRatesService::new();
        service.expect_base_currency().return_const(Currency::Usd);
        service
            .expect_get_rates()
            .times(expected_fetches)
            .returning(market);

        service
    }

    #[test]
    fn display_currency_falls_back_to_default() {
        let presenter = CarPresenter::new(Arc::new(rates_service(0)), Currency::Usd);

        assert_eq!(presenter.resolve_display_currency(Some("eur")), Currency::Eur);
        assert_eq!(presenter.resolve_display_currency(Some("GBP")), Currency::Usd);
        assert_eq!(presenter.resolve_display_currency(None), Currency::Usd);
    }

    #[tokio::test]
    async fn present_car_converts_into_display_currency() {
        let presenter = CarPresenter::new(Arc::new(rates_service(1)), Currency::Usd);

        let view = presenter
            .present_car(&car(1, Decimal::new(100, 0)), Some("EUR"))
            .await;

        assert_eq!(view.display_currency, Currency::Eur);
        assert_eq!(view.base_currency, Currency::Usd);
        assert_eq!(view.original_price, Decimal::new(100, 0));
        assert_eq!(view.display_price, Decimal::new(9250, 2));
        assert_eq!(view.price_conversion, ConversionOutcome::Converted);
        assert_eq!(view.primary_photo_path.as_deref(), Some("cars/1/2.jpg"));
        assert_eq!(
            view.primary_thumbnail_path.as_deref(),
            Some("cars/thumbnails/2_abc123/640x360.jpg")
        );
        assert_eq!(view.options, vec!["Bluetooth"]);
    }

    #[tokio::test]
    async fn present_car_in_base_currency_skips_rates() {
        let presenter = CarPresenter::new(Arc::new(rates_service(0)), Currency::Usd);

        let view = presenter
            .present_car(&car(1, Decimal::new(1234567, 2)), None)
            .await;

        assert_eq!(view.display_price, Decimal::new(1234567, 2));
        assert_eq!(view.price_conversion, ConversionOutcome::Identity);
    }

    #[tokio::test]
    async fn present_page_loads_rates_once() {
        let presenter = CarPresenter::new(Arc::new(rates_service(1)), Currency::Usd);

        let page = CarPage {
            cars: vec![car(1, Decimal::new(100, 0)), car(2, Decimal::new(200, 0))],
            page: 1,
            per_page: CARS_PER_PAGE,
            total: 2,
        };

        let view = presenter.present_page(&page, Some("UAH")).await;

        let prices: Vec<_> = view.data.iter().map(|car| car.display_price).collect();

        assert_eq!(prices, vec![Decimal::new(3700, 0), Decimal::new(7400, 0)]);
        assert_eq!(view.last_page, 1);
        assert_eq!(view.rates.get(&Currency::Eur), Some(&Some(40.0)));
    }

    #[tokio::test]
    async fn missing_rates_degrade_to_base_price() {
        let mut service = MockExchangeRatesService::new();
        service.expect_base_currency().return_const(Currency::Usd);
        service
            .expect_get_rates()
            .returning(ExchangeRates::with_pivot);

        let presenter = CarPresenter::new(Arc::new(service), Currency::Usd);

        let view = presenter
            .present_car(&car(1, Decimal::new(100, 0)), Some("EUR"))
            .await;

        assert_eq!(view.display_price, Decimal::new(100, 0));
        assert_eq!(view.price_conversion, ConversionOutcome::Degraded);
    }
}
