use {crate::domain::solution, solvers_dto::solution::*};

/// Converts a settlement into the data transfer object of a single solution.
pub fn from_domain(settlement: &solution::Settlement) -> Solutions {
    Solutions {
        solutions: vec![Solution {
            id: 0,
            prices: settlement
                .prices
                .0
                .iter()
                .map(|(token, price)| (token.0, *price))
                .collect(),
            trades: settlement
                .trades
                .iter()
                .map(|trade| {
                    let fee = trade.fee();
                    Trade::Fulfillment(Fulfillment {
                        order: OrderUid(trade.order.uid.0),
                        executed_amount: trade.executed().amount,
                        fee: (trade.order.solver_determines_fee() && !fee.is_zero())
                            .then_some(fee),
                    })
                })
                .collect(),
            interactions: settlement
                .interactions
                .iter()
                .map(|interaction| {
                    Interaction::Liquidity(LiquidityInteraction {
                        internalize: false,
                        id: interaction.liquidity.0.clone(),
                        input_token: interaction.input.token.0,
                        output_token: interaction.output.token.0,
                        input_amount: interaction.input.amount,
                        output_amount: interaction.output.amount,
                    })
                })
                .collect(),
            gas: settlement.gas.0.saturating_to(),
        }],
    }
}

/// The response when no valid settlement was found.
pub fn trivial() -> Solutions {
    Solutions {
        solutions: vec![Solution {
            id: 0,
            prices: Default::default(),
            trades: Vec::new(),
            interactions: Vec::new(),
            gas: 0,
        }],
    }
}
