mod common;

use proptest::prelude::*;

use common::{TestWorkbook, text};
use sheetbind_core::{Bindable, Reader, SheetSelector, Shape, filtered, filtered_and_sorted, sorted};
use sheetbind_model::{BindingSet, RequiredFields};

#[derive(Debug, Default, Clone, PartialEq)]
struct Product {
    code: String,
    price: f64,
}

impl Bindable for Product {
    fn shape() -> Shape<Self> {
        Shape::<Self>::builder("Product")
            .field("Code", |p| &mut p.code)
            .field("Price", |p| &mut p.price)
            .build()
    }
}

fn catalog() -> TestWorkbook {
    TestWorkbook::single(
        &["Code", "Price"],
        vec![
            vec![text("C"), text("3.5")],
            vec![text("A"), text("12")],
            vec![text("B"), text("0.5")],
            vec![text("D"), text("12")],
        ],
    )
}

#[test]
fn reader_filters_sorts_and_combines() {
    let workbook = catalog();
    let reader = Reader::new(&workbook);
    let bindings = BindingSet::flat([("Code", "Code"), ("Price", "Price")]).unwrap();
    let required = RequiredFields::new();

    let cheap = reader
        .read_filtered::<Product>(SheetSelector::First, &bindings, &required, |p| p.price < 10.0)
        .unwrap();
    assert_eq!(cheap.iter().map(|p| p.code.as_str()).collect::<Vec<_>>(), ["C", "B"]);

    let by_price = reader
        .read_sorted::<Product>(SheetSelector::First, &bindings, &required, |a, b| {
            a.price.total_cmp(&b.price)
        })
        .unwrap();
    assert_eq!(
        by_price.iter().map(|p| p.code.as_str()).collect::<Vec<_>>(),
        ["B", "C", "A", "D"]
    );

    let both = reader
        .read_filtered_and_sorted::<Product>(
            SheetSelector::First,
            &bindings,
            &required,
            |p| p.price > 1.0,
            |a, b| b.price.total_cmp(&a.price),
        )
        .unwrap();
    assert_eq!(both.iter().map(|p| p.code.as_str()).collect::<Vec<_>>(), ["A", "D", "C"]);
}

proptest! {
    #[test]
    fn filter_then_sort_equals_combined(values in proptest::collection::vec((0i32..20, 0u8..4), 0..40), threshold in 0i32..20) {
        let predicate = |item: &(i32, u8)| item.0 >= threshold;
        let compare = |a: &(i32, u8), b: &(i32, u8)| a.1.cmp(&b.1);

        let stepwise = sorted(filtered(values.clone(), predicate), compare);
        let combined = filtered_and_sorted(values, predicate, compare);
        prop_assert_eq!(stepwise, combined);
    }
}
