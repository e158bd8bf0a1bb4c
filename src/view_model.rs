//! View-Model Derivation
//!
//! Pure functions that turn the fetched token list plus the current view
//! state into the lists the UI renders:
//!
//! - `displayed`: cap filter, then a stable sort on the active field
//! - `searched`: the displayed list reduced by the live text query
//! - `rank_by_address`: positional rank within the displayed list
//! - `highlight_window`: the up-to-three-row window around the reference
//!   token in a metric-specific descending order
//!
//! Nothing in here touches the terminal; the rendering layer consumes these
//! results and the tests exercise them directly.

use crate::data::Token;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Tokens at or below this market cap are hidden while the cap filter is
/// active (`show_all == false`).
pub const CAP_FILTER_THRESHOLD: f64 = 1_000_000.0;

/// Default anchor for the highlight windows.
pub const REFERENCE_TOKEN: &str = "Vine Coin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Symbol,
    Holders,
    MarketCap,
    Price,
    Volume24h,
    Supply,
}

impl SortField {
    /// Column order as presented in the main table.
    pub const ALL: [SortField; 7] = [
        SortField::Name,
        SortField::Symbol,
        SortField::Holders,
        SortField::MarketCap,
        SortField::Price,
        SortField::Volume24h,
        SortField::Supply,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Symbol => "Symbol",
            SortField::Holders => "Holders",
            SortField::MarketCap => "Market Cap ($)",
            SortField::Price => "Price",
            SortField::Volume24h => "24H Volume ($)",
            SortField::Supply => "Supply",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// The two metric-specific highlight rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightMetric {
    Holders,
    Volume24h,
}

impl HighlightMetric {
    fn field(self) -> SortField {
        match self {
            HighlightMetric::Holders => SortField::Holders,
            HighlightMetric::Volume24h => SortField::Volume24h,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            HighlightMetric::Holders => "Rank by Holders",
            HighlightMetric::Volume24h => "Rank by Volume",
        }
    }
}

/// Per-column visibility, independent of sorting and filtering.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    hidden: Vec<SortField>,
}

impl Default for ColumnSet {
    fn default() -> Self {
        // Price and supply start hidden, as in the source dashboard.
        Self {
            hidden: vec![SortField::Price, SortField::Supply],
        }
    }
}

impl ColumnSet {
    pub fn is_visible(&self, field: SortField) -> bool {
        !self.hidden.contains(&field)
    }

    pub fn toggle(&mut self, field: SortField) {
        if let Some(pos) = self.hidden.iter().position(|f| *f == field) {
            self.hidden.remove(pos);
        } else {
            self.hidden.push(field);
        }
    }

    pub fn visible(&self) -> Vec<SortField> {
        SortField::ALL
            .iter()
            .copied()
            .filter(|f| self.is_visible(*f))
            .collect()
    }
}

/// The complete UI state the derivation depends on. The query is stored
/// lowercased so matching is a plain substring test.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub show_all: bool,
    pub query: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub columns: ColumnSet,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            show_all: false,
            query: String::new(),
            sort_field: SortField::Holders,
            sort_order: SortOrder::Desc,
            columns: ColumnSet::default(),
        }
    }
}

impl ViewState {
    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_lowercase();
    }

    /// Header-click semantics: re-sorting the active field flips descending
    /// to ascending; any other field starts descending.
    pub fn sort_on(&mut self, field: SortField) {
        if self.sort_field == field && self.sort_order == SortOrder::Desc {
            self.sort_order = SortOrder::Asc;
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Desc;
        }
    }

    pub fn toggle_column(&mut self, field: SortField) {
        self.columns.toggle(field);
    }
}

enum FieldValue<'a> {
    Text(&'a str),
    Number(Option<f64>),
}

fn field_value(token: &Token, field: SortField) -> FieldValue<'_> {
    match field {
        SortField::Name => FieldValue::Text(&token.name),
        SortField::Symbol => FieldValue::Text(&token.symbol),
        SortField::Holders => FieldValue::Number(Some(token.holders as f64)),
        SortField::MarketCap => FieldValue::Number(token.market_cap),
        SortField::Price => FieldValue::Number(token.price),
        SortField::Volume24h => FieldValue::Number(token.volume_24h),
        SortField::Supply => FieldValue::Number(token.supply),
    }
}

/// Total order on a field. A missing value sorts below any present value.
fn compare_on(a: &Token, b: &Token, field: SortField) -> Ordering {
    match (field_value(a, field), field_value(b, field)) {
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        (FieldValue::Number(x), FieldValue::Number(y)) => match (x, y) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.total_cmp(&y),
        },
        // Fields are homogeneous; mixed arms cannot occur.
        _ => Ordering::Equal,
    }
}

fn passes_cap_filter(token: &Token, show_all: bool) -> bool {
    show_all
        || token
            .market_cap
            .map_or(false, |cap| cap > CAP_FILTER_THRESHOLD)
}

fn sorted_by<'a>(mut rows: Vec<&'a Token>, field: SortField, order: SortOrder) -> Vec<&'a Token> {
    // Vec::sort_by is stable, so equal keys keep their dataset order in
    // either direction.
    rows.sort_by(|a, b| {
        let ord = compare_on(a, b, field);
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    rows
}

/// The displayed list: cap-filtered (when active) and stably sorted on the
/// current field and order. Ranks are positions in this list.
pub fn displayed<'a>(tokens: &'a [Token], state: &ViewState) -> Vec<&'a Token> {
    let rows = tokens
        .iter()
        .filter(|t| passes_cap_filter(t, state.show_all))
        .collect();
    sorted_by(rows, state.sort_field, state.sort_order)
}

/// The searched list: the displayed list reduced to rows whose name, symbol,
/// or address contains the (lowercase) query. An empty query is the identity.
pub fn searched<'a>(displayed: &[&'a Token], query: &str) -> Vec<&'a Token> {
    if query.is_empty() {
        return displayed.to_vec();
    }
    displayed
        .iter()
        .copied()
        .filter(|t| {
            t.name.to_lowercase().contains(query)
                || t.symbol.to_lowercase().contains(query)
                || t.address.to_lowercase().contains(query)
        })
        .collect()
}

/// One-based rank of every displayed token, keyed by address. Computed once
/// per derivation so row rendering is a map lookup, not a list scan.
pub fn rank_by_address<'a>(displayed: &[&'a Token]) -> HashMap<&'a str, usize> {
    displayed
        .iter()
        .enumerate()
        .map(|(i, t)| (t.address.as_str(), i + 1))
        .collect()
}

/// The up-to-three-row window {predecessor, reference, successor} around the
/// reference token in the metric-specific descending order. Ranks are
/// positions in that order, not the primary displayed-list rank. Boundary
/// positions are omitted and an absent reference yields an empty window.
pub fn highlight_window<'a>(
    tokens: &'a [Token],
    state: &ViewState,
    metric: HighlightMetric,
    reference_name: &str,
) -> Vec<(usize, &'a Token)> {
    let rows = tokens
        .iter()
        .filter(|t| passes_cap_filter(t, state.show_all))
        .collect();
    let rows = sorted_by(rows, metric.field(), SortOrder::Desc);

    let Some(idx) = rows.iter().position(|t| t.name == reference_name) else {
        return Vec::new();
    };

    let start = idx.saturating_sub(1);
    let end = (idx + 2).min(rows.len());
    (start..end).map(|i| (i + 1, rows[i])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(name: &str, holders: u64, market_cap: Option<f64>) -> Token {
        Token {
            address: format!("0x{}", name.to_lowercase().replace(' ', "_")),
            name: name.to_string(),
            symbol: name
                .split_whitespace()
                .next()
                .unwrap_or(name)
                .to_uppercase(),
            holders,
            market_cap,
            volume_24h: None,
            price: None,
            supply: None,
            icon: None,
        }
    }

    /// The three-token worked example: Vine Coin 500 holders / 2M cap,
    /// Dog 900 / 0.5M, Cat 100 / 3M.
    fn example() -> Vec<Token> {
        vec![
            token("Vine Coin", 500, Some(2_000_000.0)),
            token("Dog", 900, Some(500_000.0)),
            token("Cat", 100, Some(3_000_000.0)),
        ]
    }

    fn names(rows: &[&Token]) -> Vec<String> {
        rows.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn cap_filter_and_sort_produce_the_displayed_list() {
        let tokens = example();
        let state = ViewState::default(); // cap filter active, holders desc
        let rows = displayed(&tokens, &state);
        assert_eq!(names(&rows), ["Vine Coin", "Cat"]);

        let ranks = rank_by_address(&rows);
        assert_eq!(ranks[rows[0].address.as_str()], 1);
        assert_eq!(ranks[rows[1].address.as_str()], 2);
    }

    #[test]
    fn excluded_token_reappears_when_filter_is_off() {
        let tokens = example();
        let mut state = ViewState::default();
        state.toggle_show_all();
        let rows = displayed(&tokens, &state);
        assert_eq!(names(&rows), ["Dog", "Vine Coin", "Cat"]);
    }

    #[test]
    fn tokens_without_market_cap_follow_the_filter() {
        let mut tokens = example();
        tokens.push(token("Ghost", 50, None));

        let mut state = ViewState::default();
        let active = displayed(&tokens, &state);
        assert!(!names(&active).contains(&"Ghost".to_string()));

        state.toggle_show_all();
        let inactive = displayed(&tokens, &state);
        assert!(names(&inactive).contains(&"Ghost".to_string()));
    }

    #[test]
    fn asc_then_desc_reverses_distinct_values() {
        let tokens = example();
        let mut state = ViewState::default();
        state.show_all = true;

        state.sort_field = SortField::Holders;
        state.sort_order = SortOrder::Asc;
        let asc = displayed(&tokens, &state);

        state.sort_order = SortOrder::Desc;
        let desc = displayed(&tokens, &state);

        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(names(&desc), names(&reversed));
    }

    #[test]
    fn missing_sort_values_order_below_present_ones() {
        let tokens = vec![
            token("Full", 1, Some(5_000_000.0)),
            token("Empty", 2, None),
            token("Half", 3, Some(2_000_000.0)),
        ];
        let mut state = ViewState::default();
        state.show_all = true;
        state.sort_field = SortField::MarketCap;

        state.sort_order = SortOrder::Asc;
        assert_eq!(names(&displayed(&tokens, &state)), ["Empty", "Half", "Full"]);

        state.sort_order = SortOrder::Desc;
        assert_eq!(names(&displayed(&tokens, &state)), ["Full", "Half", "Empty"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let tokens = vec![
            token("First", 100, Some(2_000_000.0)),
            token("Second", 100, Some(2_000_000.0)),
            token("Third", 100, Some(2_000_000.0)),
        ];
        let state = ViewState::default();
        assert_eq!(
            names(&displayed(&tokens, &state)),
            ["First", "Second", "Third"]
        );
    }

    #[test]
    fn string_fields_sort_lexicographically() {
        let tokens = example();
        let mut state = ViewState::default();
        state.show_all = true;
        state.sort_field = SortField::Name;
        state.sort_order = SortOrder::Asc;
        assert_eq!(names(&displayed(&tokens, &state)), ["Cat", "Dog", "Vine Coin"]);
    }

    #[test]
    fn empty_query_is_the_identity() {
        let tokens = example();
        let mut state = ViewState::default();
        state.show_all = true;
        let rows = displayed(&tokens, &state);
        assert_eq!(names(&searched(&rows, "")), names(&rows));
    }

    #[test]
    fn search_is_idempotent() {
        let tokens = example();
        let mut state = ViewState::default();
        state.show_all = true;
        let rows = displayed(&tokens, &state);

        let once = searched(&rows, "o");
        let twice = searched(&once, "o");
        assert_eq!(names(&once), names(&twice));
    }

    #[test]
    fn search_matches_name_symbol_and_address() {
        let tokens = example();
        let mut state = ViewState::default();
        state.show_all = true;
        let rows = displayed(&tokens, &state);

        assert_eq!(names(&searched(&rows, "vine")), ["Vine Coin"]);
        assert_eq!(names(&searched(&rows, "dog")), ["Dog"]);
        assert_eq!(names(&searched(&rows, "0xcat")), ["Cat"]);
        assert!(searched(&rows, "zebra").is_empty());
    }

    #[test]
    fn toggling_the_filter_twice_restores_the_ordering() {
        let tokens = example();
        let mut state = ViewState::default();
        let before = names(&displayed(&tokens, &state));

        state.toggle_show_all();
        state.toggle_show_all();
        let after = names(&displayed(&tokens, &state));
        assert_eq!(before, after);
    }

    #[test]
    fn rank_is_stable_under_search() {
        let tokens = example();
        let mut state = ViewState::default();
        state.show_all = true;
        let rows = displayed(&tokens, &state);
        let ranks = rank_by_address(&rows);

        // Dog(900) rank 1, Vine Coin(500) rank 2, Cat(100) rank 3 whether or
        // not a query narrows the visible rows.
        let narrowed = searched(&rows, "vine");
        assert_eq!(ranks[narrowed[0].address.as_str()], 2);
    }

    #[test]
    fn sort_on_toggles_order_for_the_active_field() {
        let mut state = ViewState::default();
        assert_eq!(state.sort_order, SortOrder::Desc);

        state.sort_on(SortField::Holders);
        assert_eq!(state.sort_order, SortOrder::Asc);

        state.sort_on(SortField::MarketCap);
        assert_eq!(state.sort_field, SortField::MarketCap);
        assert_eq!(state.sort_order, SortOrder::Desc);
    }

    #[test]
    fn highlight_window_surrounds_the_reference() {
        let tokens = example();
        let mut state = ViewState::default();
        state.show_all = true;

        let window = highlight_window(&tokens, &state, HighlightMetric::Holders, "Vine Coin");
        let got: Vec<(usize, &str)> = window.iter().map(|(r, t)| (*r, t.name.as_str())).collect();
        assert_eq!(got, [(1, "Dog"), (2, "Vine Coin"), (3, "Cat")]);
    }

    #[test]
    fn highlight_window_shrinks_at_the_boundary() {
        let tokens = example();
        let mut state = ViewState::default();
        state.show_all = true;

        // Dog leads the holders ranking, so it has no predecessor.
        let window = highlight_window(&tokens, &state, HighlightMetric::Holders, "Dog");
        let got: Vec<(usize, &str)> = window.iter().map(|(r, t)| (*r, t.name.as_str())).collect();
        assert_eq!(got, [(1, "Dog"), (2, "Vine Coin")]);

        // Cat trails it, so it has no successor.
        let window = highlight_window(&tokens, &state, HighlightMetric::Holders, "Cat");
        let got: Vec<(usize, &str)> = window.iter().map(|(r, t)| (*r, t.name.as_str())).collect();
        assert_eq!(got, [(2, "Vine Coin"), (3, "Cat")]);
    }

    #[test]
    fn highlight_window_is_empty_without_the_reference() {
        let tokens = example();
        let state = ViewState::default();
        assert!(highlight_window(&tokens, &state, HighlightMetric::Holders, "Nope").is_empty());
    }

    #[test]
    fn highlight_window_respects_the_cap_filter() {
        let tokens = example();
        let state = ViewState::default(); // filter active: Dog drops out
        let window = highlight_window(&tokens, &state, HighlightMetric::Holders, "Vine Coin");
        let got: Vec<(usize, &str)> = window.iter().map(|(r, t)| (*r, t.name.as_str())).collect();
        assert_eq!(got, [(1, "Vine Coin"), (2, "Cat")]);
    }

    #[test]
    fn highlight_window_ranks_by_its_own_metric() {
        let mut tokens = example();
        tokens[0].volume_24h = Some(10.0); // Vine Coin
        tokens[1].volume_24h = Some(30.0); // Dog
        tokens[2].volume_24h = Some(20.0); // Cat
        let mut state = ViewState::default();
        state.show_all = true;

        let window = highlight_window(&tokens, &state, HighlightMetric::Volume24h, "Vine Coin");
        let got: Vec<(usize, &str)> = window.iter().map(|(r, t)| (*r, t.name.as_str())).collect();
        // Volume order: Dog(30), Cat(20), Vine Coin(10).
        assert_eq!(got, [(2, "Cat"), (3, "Vine Coin")]);
    }

    #[test]
    fn default_columns_hide_price_and_supply() {
        let columns = ColumnSet::default();
        assert!(columns.is_visible(SortField::Name));
        assert!(columns.is_visible(SortField::Volume24h));
        assert!(!columns.is_visible(SortField::Price));
        assert!(!columns.is_visible(SortField::Supply));
    }

    #[test]
    fn column_toggle_round_trips() {
        let mut columns = ColumnSet::default();
        columns.toggle(SortField::Price);
        assert!(columns.is_visible(SortField::Price));
        columns.toggle(SortField::Price);
        assert!(!columns.is_visible(SortField::Price));
        assert_eq!(columns.visible().len(), 5);
    }

    #[test]
    fn queries_are_stored_lowercased() {
        let mut state = ViewState::default();
        state.set_query("ViNe");
        assert_eq!(state.query, "vine");
    }
}
