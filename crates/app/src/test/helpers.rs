//! Test Helpers

use std::io::Cursor;

use image::{ImageBuffer, ImageFormat, Rgb};
use rust_decimal::Decimal;

use crate::domain::{
    cars::{
        CarsService, CarsServiceError,
        data::{CarAttributes, NewCar},
        models::Car,
    },
    options::RawOption,
    photos::PhotoUpload,
};

use super::TestContext;

pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("failed to encode test png");

    buf.into_inner()
}

pub(crate) fn upload(file_name: &str) -> PhotoUpload {
    PhotoUpload::new(file_name, png_bytes(120, 80))
}

pub(crate) fn attributes() -> CarAttributes {
    CarAttributes {
        brand: "Toyota".to_string(),
        model: "Corolla".to_string(),
        year: 2019,
        price: Decimal::new(1_500_000, 2),
        description: Some("One owner".to_string()),
    }
}

pub(crate) fn options(names: &[&str]) -> Vec<RawOption> {
    names.iter().copied().map(RawOption::from).collect()
}

pub(crate) async fn create_car(
    ctx: &TestContext,
    photos: Vec<PhotoUpload>,
    primary_photo_index: Option<usize>,
) -> Result<Car, CarsServiceError> {
    ctx.cars
        .create_car(NewCar {
            attributes: attributes(),
            options: options(&["Bluetooth"]),
            photos,
            primary_photo_index,
        })
        .await
}

pub(crate) fn primary_count(car: &Car) -> usize {
    car.photos.iter().filter(|photo| photo.is_primary).count()
}
